// SPDX-License-Identifier: Apache-2.0

//! Settings-file walkthrough: decode a config document field by field,
//! tolerate unknown keys, then re-emit the parts we kept.

use std::process::ExitCode;

use seekjson::{JsonReader, JsonWriter, SliceStream};

const SETTINGS: &str = r#"
{
    "window": { "width": 1280, "height": 720, "title": "seekjson demo" },
    "vsync": true,
    "gamma": 2.2,
    "recent_files": ["notes.txt", "todo.md"],
    "experimental": { "gpu_path": false, "threads": 8 }
}
"#;

#[derive(Default)]
struct Settings {
    width: f64,
    height: f64,
    title: String,
    vsync: bool,
    gamma: f64,
    recent: Vec<String>,
}

fn decode(doc: &[u8]) -> Result<Settings, String> {
    let mut r = JsonReader::new(SliceStream::new(doc));
    let mut s = Settings::default();
    let mut scratch = [0u8; 256];

    if r.table_begin() {
        while r.table_has_next() {
            if r.accept_key("window") {
                if r.table_begin() {
                    while r.table_has_next() {
                        if r.accept_key("width") {
                            s.width = r.read_f64();
                        } else if r.accept_key("height") {
                            s.height = r.read_f64();
                        } else if r.accept_key("title") {
                            let text = r.read_string_into(&mut scratch);
                            s.title = String::from_utf8_lossy(text).into_owned();
                        } else {
                            r.skip_key_value();
                        }
                    }
                }
            } else if r.accept_key("vsync") {
                s.vsync = r.read_bool();
            } else if r.accept_key("gamma") {
                s.gamma = r.read_f64();
            } else if r.accept_key("recent_files") {
                if r.array_begin() {
                    while r.array_has_next() {
                        let text = r.read_string_into(&mut scratch);
                        s.recent.push(String::from_utf8_lossy(text).into_owned());
                    }
                }
            } else {
                // Anything we don't understand is skipped, not an error.
                r.skip_key_value();
            }
        }
    }

    match r.finish() {
        Ok(_) => Ok(s),
        Err(diag) => Err(diag.to_string()),
    }
}

fn emit(s: &Settings) -> String {
    let mut w = JsonWriter::new(Vec::new());
    let _ = w.table_begin();
    let _ = w.key("window");
    let _ = w.table_begin();
    let _ = w.key("width");
    let _ = w.f64(s.width);
    let _ = w.key("height");
    let _ = w.f64(s.height);
    let _ = w.key("title");
    let _ = w.string(&s.title);
    let _ = w.table_end();
    let _ = w.key("vsync");
    let _ = w.bool(s.vsync);
    let _ = w.key("gamma");
    let _ = w.f64(s.gamma);
    let _ = w.key("recent_files");
    let _ = w.array_begin();
    for name in &s.recent {
        let _ = w.string(name);
    }
    let _ = w.array_end();
    let _ = w.table_end();
    String::from_utf8_lossy(&w.into_sink()).into_owned()
}

fn main() -> ExitCode {
    let doc = match std::env::args().nth(1) {
        Some(path) => match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => SETTINGS.as_bytes().to_vec(),
    };

    let settings = match decode(&doc) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    println!("window:  {}x{} \"{}\"", settings.width, settings.height, settings.title);
    println!("vsync:   {}", settings.vsync);
    println!("gamma:   {}", settings.gamma);
    println!("recent:  {:?}", settings.recent);
    println!();
    println!("re-emitted: {}", emit(&settings));
    ExitCode::SUCCESS
}
