use charless2c::{Config, Error, Machine};
use charless_arch::OpKind;
use color_print::{ceprintln, cprintln};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input charless file
    input: PathBuf,

    /// Output file [default: input with `.c` extension]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Runtime config (YAML)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Dump decoded instructions
    #[clap(short, long)]
    dump: bool,

    /// Only dump instructions with these mnemonics (e.g. `push`, `jz`)
    #[clap(short, long, value_parser = OpKind::parse)]
    filter: Vec<OpKind>,

    /// Execute on the emulator instead of writing C
    #[clap(short, long)]
    run: bool,

    /// Step limit for --run
    #[clap(short = 't', long)]
    max_steps: Option<u64>,

    /// Enable verbose output
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let input = args.input.display().to_string();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            e.print_diag(&input);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Error> {
    let input = args.input.display().to_string();
    let code = std::fs::read_to_string(&args.input).map_err(|e| Error::FileOpen(input.clone(), e))?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let program = charless2c::decode(&code);

    if args.dump {
        for line in charless2c::dump(&program, &args.filter) {
            println!("{line}");
        }
    }

    if args.run {
        let mut machine = Machine::new(&program, &config);
        let exit = machine.run(
            &mut std::io::stdin().lock(),
            &mut std::io::stdout().lock(),
            args.max_steps,
        )?;
        if args.verbose {
            ceprintln!(
                "<green,bold>Finished</> {:?} after {} steps",
                exit,
                machine.steps()
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("c"));
    let c = charless2c::emit(&program, &config);
    std::fs::write(&output, c).map_err(|e| Error::FileWrite(output.display().to_string(), e))?;
    cprintln!(
        "<green,bold>Transpiled</> {} -> {} ({} instructions)",
        input,
        output.display(),
        program.insts.len()
    );
    Ok(ExitCode::SUCCESS)
}
