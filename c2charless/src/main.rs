use c2charless::Error;
use color_print::cprintln;
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
    /// Input C source
    input: PathBuf,

    /// Output file [default: input with `.cless` extension]
    #[clap(short, long)]
    output: Option<PathBuf>,

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
    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            Error::FileOpen(input, e).print_diag("", "");
            return ExitCode::FAILURE;
        }
    };

    let code = match c2charless::generate(&source).and_then(|program| {
        if args.verbose {
            for (name, addr) in program.symbols.iter() {
                cprintln!("<b>{:>5}</> {}", addr, name);
            }
        }
        Ok(c2charless::resolve(&program.insts)?)
    }) {
        Ok(code) => code,
        Err(e) => {
            e.print_diag(&input, &source);
            return ExitCode::FAILURE;
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("cless"));
    if let Err(e) = std::fs::write(&output, &code) {
        Error::FileWrite(output.display().to_string(), e).print_diag("", "");
        return ExitCode::FAILURE;
    }

    cprintln!(
        "<green,bold>Compiled</> {} -> {} ({} digits)",
        input,
        output.display(),
        code.len()
    );
    ExitCode::SUCCESS
}
