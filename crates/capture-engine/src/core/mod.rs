pub use self::{cell_grid::*, direction::*, distancer::*, layout::*, position::*};

pub(crate) mod cell_grid;
pub(crate) mod direction;
pub(crate) mod distancer;
pub(crate) mod layout;
pub(crate) mod position;
