pub mod multipart;

pub use multipart::{sniff_boundary, MultipartDecoder};
