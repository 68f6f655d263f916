// Pure decoders: image de-obfuscation and markup payload extraction.

pub mod image;
pub mod markup;
pub mod payload;

pub use image::{DecodeError, DecodedImage};
pub use markup::{MarkupNode, ParseError};
