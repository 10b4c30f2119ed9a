//! State encoding: turning a game snapshot into a feature vector.
//!
//! The encoder is a pure function of [`SnakeGame`] state. It produces exactly
//! [`FEATURE_COUNT`] values in a fixed order, which is the input width every
//! policy must accept.
//!
//! # Layout
//!
//! | index  | feature                                                            |
//! |--------|--------------------------------------------------------------------|
//! | 0..24  | 8 rays (N, NE, E, SE, S, SW, W, NW) × (wall, body, food) reciprocal distances |
//! | 24, 25 | food `x`, `y`                                                      |
//! | 26, 27 | head `x`, `y`                                                      |
//! | 28, 29 | `(head - food) / board size` on each axis                          |
//! | 30..34 | head distance to left, right, top, bottom wall as board fractions |
//! | 34..38 | one-hot heading (Up, Right, Down, Left)                            |
//! | 38, 39 | tail end `x`, `y`                                                  |
//! | 40..44 | tail heading slots, always zero                                    |
//!
//! # Ray Distances
//!
//! A ray walks outward from the head one cell at a time until it leaves the
//! board, counting every step including the one that leaves. Each reading is a
//! reciprocal distance:
//!
//! - wall: `1 / total_steps`
//! - body, food: `1 / steps_to_first_hit`, or `1 / total_steps` if the ray
//!   never hits one
//!
//! North is [`Direction::Up`], i.e. decreasing `y`.

use oxisnake_engine::{BOARD_HEIGHT, BOARD_WIDTH, Direction, Position, SnakeGame, is_in_bounds};

/// Number of ray directions.
pub const RAY_COUNT: usize = 8;

/// Number of readings per ray (wall, body, food).
pub const READINGS_PER_RAY: usize = 3;

/// Number of scalar features following the rays.
pub const SCALAR_FEATURE_COUNT: usize = 20;

/// Width of the encoded feature vector.
pub const FEATURE_COUNT: usize = RAY_COUNT * READINGS_PER_RAY + SCALAR_FEATURE_COUNT;

/// Compass directions as `(dx, dy)` in N, NE, E, SE, S, SW, W, NW order.
pub const RAY_DIRECTIONS: [(i32, i32); RAY_COUNT] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Reciprocal distances observed along one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayReading {
    pub wall: f64,
    pub body: f64,
    pub food: f64,
}

/// Casts a ray from the head in direction `(dx, dy)`.
///
/// # Example
///
/// ```
/// use oxisnake_engine::{Position, Seed, SnakeGame};
/// use oxisnake_evaluator::state_encoder::cast_ray;
///
/// let mut game = SnakeGame::with_seed(Seed::from_bytes([0; 16]));
/// game.place_food_at(Position::new(9, 9)).unwrap();
///
/// // Looking west from (5, 5): body at 1 step, wall after 6 steps, no food.
/// let west = cast_ray(&game, -1, 0);
/// assert_eq!(west.body, 1.0);
/// assert_eq!(west.wall, 1.0 / 6.0);
/// assert_eq!(west.food, 1.0 / 6.0);
/// ```
#[must_use]
pub fn cast_ray(game: &SnakeGame, dx: i32, dy: i32) -> RayReading {
    let snake = game.snake();
    let food = game.food();

    let mut pos = snake.head();
    let mut total = 0_u32;
    let mut body_steps = None;
    let mut food_steps = None;
    loop {
        pos = pos.offset(dx, dy);
        total += 1;
        if !is_in_bounds(pos) {
            break;
        }
        if food_steps.is_none() && pos == food {
            food_steps = Some(total);
        }
        if body_steps.is_none() && snake.occupies(pos) {
            body_steps = Some(total);
        }
    }

    let total = f64::from(total);
    RayReading {
        wall: 1.0 / total,
        body: 1.0 / body_steps.map_or(total, f64::from),
        food: 1.0 / food_steps.map_or(total, f64::from),
    }
}

/// Encodes the game state into a feature vector.
///
/// # Example
///
/// ```
/// use oxisnake_engine::{Seed, SnakeGame};
/// use oxisnake_evaluator::state_encoder::{FEATURE_COUNT, encode};
///
/// let game = SnakeGame::with_seed(Seed::from_bytes([1; 16]));
/// let features = encode(&game);
/// assert_eq!(features.len(), FEATURE_COUNT);
/// // Initial heading is Right.
/// assert_eq!(&features[34..38], &[0.0, 1.0, 0.0, 0.0]);
/// ```
#[must_use]
pub fn encode(game: &SnakeGame) -> [f64; FEATURE_COUNT] {
    let mut features = [0.0; FEATURE_COUNT];
    encode_into(game, &mut features);
    features
}

/// Like [`encode`], but writes into an existing buffer.
pub fn encode_into(game: &SnakeGame, features: &mut [f64; FEATURE_COUNT]) {
    let (rays, scalars) = features.split_at_mut(RAY_COUNT * READINGS_PER_RAY);

    for (chunk, (dx, dy)) in rays.chunks_exact_mut(READINGS_PER_RAY).zip(RAY_DIRECTIONS) {
        let reading = cast_ray(game, dx, dy);
        chunk.copy_from_slice(&[reading.wall, reading.body, reading.food]);
    }

    let snake = game.snake();
    let head = snake.head();
    let food = game.food();
    let tail = snake.tail_end();
    let width = f64::from(BOARD_WIDTH);
    let height = f64::from(BOARD_HEIGHT);

    let mut heading = [0.0; Direction::LEN];
    heading[snake.direction().index()] = 1.0;

    let [fx, fy] = coords(food);
    let [hx, hy] = coords(head);
    let [tx, ty] = coords(tail);
    let values = [
        fx,
        fy,
        hx,
        hy,
        (hx - fx) / width,
        (hy - fy) / height,
        hx / width,
        (width - hx) / width,
        hy / height,
        (height - hy) / height,
        heading[0],
        heading[1],
        heading[2],
        heading[3],
        tx,
        ty,
        // tail heading one-hot, not populated
        0.0,
        0.0,
        0.0,
        0.0,
    ];
    scalars.copy_from_slice(&values);
}

fn coords(pos: Position) -> [f64; 2] {
    [f64::from(pos.x), f64::from(pos.y)]
}

#[cfg(test)]
mod tests {
    use oxisnake_engine::Seed;

    use super::*;

    const SEED: Seed = Seed::from_bytes([0x42; 16]);

    fn game_with_food(food: Position) -> SnakeGame {
        let mut game = SnakeGame::with_seed(SEED);
        game.place_food_at(food).unwrap();
        game
    }

    fn ray(features: &[f64], index: usize) -> &[f64] {
        &features[index * READINGS_PER_RAY..(index + 1) * READINGS_PER_RAY]
    }

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 44);
    }

    #[test]
    fn test_rays_from_start_position() {
        // Head (5, 5), body (4, 5) (3, 5) (2, 5), food straight north at (5, 2).
        let game = game_with_food(Position::new(5, 2));
        let features = encode(&game);

        // N: wall after 6 steps (y = 4..0 then off-board), food at 3, no body.
        assert_eq!(ray(&features, 0), &[1.0 / 6.0, 1.0 / 6.0, 1.0 / 3.0]);
        // E: x = 6..9 then off-board.
        assert_eq!(ray(&features, 2), &[1.0 / 5.0, 1.0 / 5.0, 1.0 / 5.0]);
        // S: y = 6..9 then off-board.
        assert_eq!(ray(&features, 4), &[1.0 / 5.0, 1.0 / 5.0, 1.0 / 5.0]);
        // W: body right behind the head.
        assert_eq!(ray(&features, 6), &[1.0 / 6.0, 1.0, 1.0 / 6.0]);
        // NE: (6,4) (7,3) (8,2) (9,1) then off-board.
        assert_eq!(ray(&features, 1), &[1.0 / 5.0, 1.0 / 5.0, 1.0 / 5.0]);
    }

    #[test]
    fn test_scalar_features() {
        let game = game_with_food(Position::new(8, 1));
        let features = encode(&game);
        let scalars = &features[24..];

        assert_eq!(&scalars[0..4], &[8.0, 1.0, 5.0, 5.0]);
        assert_eq!(&scalars[4..6], &[-3.0 / 10.0, 4.0 / 10.0]);
        assert_eq!(&scalars[6..10], &[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(&scalars[10..14], &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(&scalars[14..16], &[2.0, 5.0]);
        assert_eq!(&scalars[16..20], &[0.0; 4]);
    }

    #[test]
    fn test_heading_and_tail_follow_moves() {
        let mut game = game_with_food(Position::new(9, 9));
        game.step(Direction::Up);
        let features = encode(&game);

        assert_eq!(&features[26..28], &[5.0, 4.0]);
        assert_eq!(&features[34..38], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&features[38..40], &[3.0, 5.0]);
    }

    #[test]
    fn test_encoding_is_pure() {
        let game = SnakeGame::with_seed(SEED);
        let a = encode(&game);
        let b = encode(&game);
        assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
    }

    #[test]
    fn test_all_values_finite() {
        let mut game = SnakeGame::with_seed(SEED);
        for dir in [Direction::Up, Direction::Up, Direction::Left, Direction::Down] {
            assert!(encode(&game).iter().all(|v| v.is_finite()));
            game.step(dir);
        }
    }
}
