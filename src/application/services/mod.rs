pub mod access_policy;
pub mod magnet_extractor;
pub mod preview_formatter;
pub mod reference_text;
pub mod size_formatter;
pub mod text_splitter;

pub use access_policy::AccessPolicy;
pub use magnet_extractor::MagnetExtractor;
pub use preview_formatter::PreviewFormatter;
pub use reference_text::ReferenceTextResolver;
