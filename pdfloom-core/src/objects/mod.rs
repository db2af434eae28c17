mod dictionary;
mod primitive;
mod stream;

pub use dictionary::Dictionary;
pub use primitive::{escape_literal, literal_string, Object, ObjectId};
pub use stream::Stream;
