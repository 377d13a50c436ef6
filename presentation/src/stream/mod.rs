pub mod printer;

pub use printer::StreamPrinter;
