mod json;

pub use json::{
    write_data, ClassData, SequenceData, SequenceEntry, CLASS_DATA_FILE, SEQUENCE_DATA_FILE,
};
