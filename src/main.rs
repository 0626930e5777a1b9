use std::io::Read;
use std::process::ExitCode;

use differential_lib::config::{self, InferenceSettings};
use differential_lib::pipeline::DiagnosticPipeline;
use differential_lib::request::handle_request;

fn main() -> ExitCode {
    differential_lib::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = match InferenceSettings::load() {
        Ok(settings) => settings,
        Err(e) => return fail(&e.to_string()),
    };
    let pipeline = match DiagnosticPipeline::from_settings(&settings) {
        Ok(pipeline) => pipeline,
        Err(e) => return fail(&e.to_string()),
    };

    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        return fail(&format!("Cannot read request: {e}"));
    }

    let response = match handle_request(&pipeline, &raw) {
        Ok(response) => response,
        Err(e) => return fail(&e.to_string()),
    };

    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ExitCode {
    tracing::error!(error = %message, "Request failed");
    println!("{}", serde_json::json!({ "error": message }));
    ExitCode::FAILURE
}
