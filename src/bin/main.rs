use krystalscript::{scanner::Scanner, Diagnostics};
use std::{
    env,
    io::{self, BufRead, Write},
};

const PROMPT: &str = "KS> ";
const EXTENSION: &str = ".ks";
const EXIT_COMMAND: &str = "exit";

const EXIT_OK: i32 = 0;
const EXIT_USAGE: i32 = 64;
const EXIT_DATA_ERROR: i32 = 65;
const EXIT_IO_ERROR: i32 = 74;

fn main() {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let args: Vec<String> = env::args().collect();
    let result = match args.len() {
        1 => run_prompt(),
        2 => KrystalScript::new(io::stdout(), io::stderr()).run_file(args[1].as_str()),
        _ => {
            writeln!(stdout, "Usage: krystalscript [source.ks]").expect("Something went wrong");
            std::process::exit(EXIT_USAGE);
        },
    };

    match result {
        Err(e) => {
            writeln!(stderr, "{}", e).expect("Something went wrong");
            std::process::exit(EXIT_IO_ERROR);
        },
        Ok(EXIT_OK) => return,
        Ok(code) => std::process::exit(code),
    }
}

fn run_prompt() -> io::Result<i32> {
    let stdin = io::stdin();
    let mut ks = KrystalScript::new(io::stdout(), io::stderr());
    ks.repl(stdin.lock())?;
    Ok(EXIT_OK)
}

/// True when the last three characters of `path` are `.ks`, in any case.
fn has_script_extension(path: &str) -> bool {
    path.len()
        .checked_sub(EXTENSION.len())
        .and_then(|split| path.get(split..))
        .map_or(false, |tail| tail.eq_ignore_ascii_case(EXTENSION))
}

struct KrystalScript<Out, ErrOut> {
    out: Out,
    err_out: ErrOut,
    diagnostics: Diagnostics,
}

impl <Out: Write, ErrOut: Write> KrystalScript<Out, ErrOut> {
    fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            out,
            err_out,
            diagnostics: Diagnostics::new(),
        }
    }

    fn has_failed(&self) -> bool {
        self.diagnostics.has_failed()
    }

    /// Scans the script at `path` and returns the status the process should
    /// exit with. Paths without the script extension are turned away.
    fn run_file(&mut self, path: &str) -> io::Result<i32> {
        if !has_script_extension(path) {
            writeln!(
                self.out,
                "Please pass in a KrystalScript code file (file must have a {} extension).",
                EXTENSION
            )?;
            return Ok(EXIT_OK);
        }

        let bytes = std::fs::read(path)?;
        let contents = String::from_utf8_lossy(&bytes);
        self.run(&contents)?;

        if self.has_failed() {
            Ok(EXIT_DATA_ERROR)
        } else {
            Ok(EXIT_OK)
        }
    }

    fn repl<In: BufRead>(&mut self, mut input: In) -> io::Result<()> {
        let mut buffer = String::new();

        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            buffer.clear();

            let num_bytes = input.read_line(&mut buffer)?;
            if num_bytes == 0 { break };

            let line = buffer.trim_end_matches(|c: char| c == '\n' || c == '\r');
            if line == EXIT_COMMAND { break };

            self.run(line)?;
            self.diagnostics.reset();
        }

        Ok(())
    }

    fn run(&mut self, source: &str) -> io::Result<()> {
        let tokens = Scanner::new(source).scan_tokens(&mut self.diagnostics);

        for e in &self.diagnostics {
            writeln!(self.err_out, "{}", e)?;
        }

        for token in tokens.iter() {
            writeln!(self.out, "{}", token)?;
        }

        Ok(())
    }
}
