//! morse - convert ASCII text to Morse code text and audio
//!
//! Reads words from a file or standard input, optionally prints or writes
//! the Morse encoding and plays it through the default output device.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use morse::settings::settings_path;
use morse::{io, AudioEngine, Settings, Translator};

#[derive(Parser, Debug)]
#[command(name = "morse", version, about = "convert ascii text to Morse code text and audio")]
struct Args {
    /// path to an input ASCII text file (reads STDIN when omitted)
    #[arg(short = 'i', long, value_name = "FILE")]
    input_ascii: Option<PathBuf>,

    /// path to output Morse coded input
    #[arg(short = 'o', long, value_name = "FILE")]
    output_ascii: Option<PathBuf>,

    /// disable Morse code audio player
    #[arg(short = 'd', long)]
    disable_audio: bool,

    /// print Morse encoding to STDOUT
    #[arg(short = 'p', long)]
    print_code: bool,

    /// integer percentage in [0, 100]; the higher the percentage the higher
    /// the pitch of each dot/dash (default 50)
    #[arg(short = 'u', long, value_name = "NUM", value_parser = clap::value_parser!(u8).range(0..=100))]
    pitch: Option<u8>,

    /// integer percentage in [0, 100]; the higher the percentage the longer
    /// each dot/dash tone lasts (default 25)
    #[arg(short = 'l', long, value_name = "NUM", value_parser = clap::value_parser!(u8).range(0..=100))]
    duration: Option<u8>,

    /// remember the effective pitch and duration as future defaults
    #[arg(long)]
    save_settings: bool,
}

fn run(args: Args) -> morse::Result<()> {
    run_with(args, &settings_path())
}

/// Run with the settings file at `settings_path`
fn run_with(args: Args, settings_path: &Path) -> morse::Result<()> {
    let mut settings = Settings::load_from(settings_path);
    if let Some(pitch) = args.pitch {
        settings.pitch_percent = pitch;
    }
    if let Some(duration) = args.duration {
        settings.duration_percent = duration;
    }
    if args.save_settings {
        settings.save_to(settings_path);
    }

    let words = match &args.input_ascii {
        Some(path) => io::read_words_from_file(path)?,
        None => io::read_words_from_stdin()?,
    };

    if args.print_code || args.output_ascii.is_some() {
        let code = morse::to_code(&words);
        if args.print_code {
            println!("{}", code);
        }
        if let Some(path) = &args.output_ascii {
            io::write_to_file(&code, path)?;
        }
    }

    if !args.disable_audio {
        let engine = AudioEngine::new(settings.audio_config())?;
        let translator = Translator::new(
            &engine,
            settings.frequency_hz(),
            settings.dot_duration_ms(),
        )?;
        log::info!(
            "Playing {} words at {:.0} Hz, {} ms per dot",
            words.len(),
            settings.frequency_hz(),
            settings.dot_duration_ms()
        );
        translator.to_audio(&words);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported through the error path too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            eprintln!("try 'morse --help' for more information");
            ExitCode::FAILURE
        }
    }
}
