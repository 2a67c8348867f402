mod las_reader;
pub use self::las_reader::*;

mod las_metadata;
pub use self::las_metadata::*;
