pub use self::{piece::*, playfield::*};

pub(crate) mod piece;
pub(crate) mod playfield;
