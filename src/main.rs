use std::process::ExitCode;

fn main() -> ExitCode {
    match halo_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("halo: {e}");
            ExitCode::FAILURE
        }
    }
}
