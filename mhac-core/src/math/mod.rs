mod extent;
pub use self::extent::*;

mod minmax;
pub use self::minmax::*;
