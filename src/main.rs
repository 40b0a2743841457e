use std::process::ExitCode;

fn main() -> ExitCode {
    match patient_manager_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
