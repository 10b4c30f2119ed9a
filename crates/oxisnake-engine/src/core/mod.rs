pub use self::{board::*, direction::*, position::*};

pub(crate) mod board;
pub(crate) mod direction;
pub(crate) mod position;
