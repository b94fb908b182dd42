pub mod form_reader;
pub mod transaction_writer;
