fn main() -> ExitCode {
    env_logger::init();
    // The first argument is taken as a path verbatim, even if it looks like a flag.
    let mut args = std::env::args_os();
    let program = args
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "iolog".to_owned());
    let Some(input_file) = args.next().map(PathBuf::from) else {
        return fail(ConvError::usage(program));
    };
    match Converter::new()
        .input(&input_file)
        .run(std::io::stdout().lock())
    {
        Ok(stats) => {
            log::info!("{}: {stats}", input_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(e: ConvError) -> ExitCode {
    eprintln!("{e}");
    ExitCode::FAILURE
}

use std::{path::PathBuf, process::ExitCode};

use trace_iolog::{convert::Converter, ConvError};
