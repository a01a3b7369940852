#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use exfilms::extraction::Extractor;
use exfilms::mzml::MzMLDocument;
use exfilms::writer::JsonWriter;

fuzz_target!(|data: &[u8]| {
    // Malformed input must fail with an error, never panic
    let Ok(document) = MzMLDocument::from_reader(Cursor::new(data)) else {
        return;
    };
    let Ok(extracted) = Extractor::default().extract(&document) else {
        return;
    };

    // Whatever was extracted must serialize
    let mut writer = JsonWriter::new(Vec::new());
    if writer.write_document(&extracted).is_ok() {
        let _ = writer.finish();
    }
});
