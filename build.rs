//! Bundles `assets/css/main.css` and its `@import`s into one minified sheet.

use std::fs;
use std::path::Path;

use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions};

const ENTRY: &str = "assets/css/main.css";
const OUT_DIR: &str = "assets/dist";
const OUT_FILE: &str = "assets/dist/bundle.css";

fn bundle(entry: &Path) -> Result<String, String> {
    let provider = FileProvider::new();
    let mut bundler = Bundler::new(&provider, None, ParserOptions::default());

    let mut sheet = bundler
        .bundle(entry)
        .map_err(|e| format!("bundle {}: {}", entry.display(), e))?;
    sheet
        .minify(MinifyOptions::default())
        .map_err(|e| format!("minify: {}", e))?;

    let css = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("print: {}", e))?;
    Ok(css.code)
}

fn main() {
    println!("cargo:rerun-if-changed=assets/css/");

    let css = match bundle(Path::new(ENTRY)) {
        Ok(css) => css,
        Err(e) => panic!("CSS bundling failed: {}", e),
    };

    if let Err(e) = fs::create_dir_all(OUT_DIR).and_then(|_| fs::write(OUT_FILE, css)) {
        panic!("Failed to write {}: {}", OUT_FILE, e);
    }
}
