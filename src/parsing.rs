pub(crate) mod error;
mod plk_parser;

pub use plk_parser::DEFAULT_OPERATOR;
pub use plk_parser::OTHERS_FILE;
pub use plk_parser::PLK_FILE;
pub use plk_parser::parse as load_platforms;
