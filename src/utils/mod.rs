pub mod file_utils;
pub mod ocr;
pub mod office_parser;
pub mod pdf_parser;
pub mod text_processor;

pub use file_utils::{generate_output_path, save_text_to_file, validate_file_path};
pub use pdf_parser::extract_text_from_pdf;
pub use text_processor::{join_units, split_paragraphs, trimmed_len};
