//! Binary entry point: resolve the model argument and run the viewer.

use std::io::Read;

use vitrine::Viewer;

/// Resolve the CLI argument into a local model path.
///
/// Filesystem paths are used as-is. `http(s)` URLs are downloaded into
/// `assets/models/` once and reused on later runs.
fn resolve_model_path(input: &str) -> Result<String, String> {
    if std::path::Path::new(input).exists() {
        return Ok(input.to_owned());
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        let file_name = input
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("model.glb");
        let models_dir = std::path::Path::new("assets/models");
        let local_path = models_dir.join(file_name);

        if local_path.exists() {
            return Ok(local_path.to_string_lossy().into_owned());
        }

        if !models_dir.exists() {
            std::fs::create_dir_all(models_dir)
                .map_err(|e| format!("failed to create models directory: {e}"))?;
        }

        log::info!("downloading {input}");
        let response = ureq::get(input)
            .call()
            .map_err(|e| format!("failed to download {input}: {e}"))?;
        let mut bytes = Vec::new();
        let _ = response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| format!("failed to read response: {e}"))?;

        std::fs::write(&local_path, &bytes)
            .map_err(|e| format!("failed to save model: {e}"))?;

        log::info!("downloaded to {}", local_path.display());
        return Ok(local_path.to_string_lossy().into_owned());
    }

    Err(format!("file not found: {input}"))
}

fn main() {
    env_logger::init();

    // Arguments are positional: `.toml` files are option presets,
    // anything else is the model to view.
    let mut builder = Viewer::builder();
    for input in std::env::args().skip(1) {
        if std::path::Path::new(&input)
            .extension()
            .is_some_and(|ext| ext == "toml")
        {
            match vitrine::Options::load(std::path::Path::new(&input)) {
                Ok(options) => builder = builder.with_options(options),
                Err(e) => {
                    log::error!("failed to load preset {input}: {e}");
                    std::process::exit(1);
                }
            }
        } else {
            match resolve_model_path(&input) {
                Ok(path) => builder = builder.with_path(path),
                Err(e) => {
                    log::error!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }

    if let Err(e) = builder.build().run() {
        log::error!("viewer exited with error: {e}");
        std::process::exit(1);
    }
}
