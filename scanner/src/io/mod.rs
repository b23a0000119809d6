// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod results;

pub use results::{CsvResults, ResultsSink, StorageError};
