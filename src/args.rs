use std::env;
use std::path::PathBuf;
use std::process::exit;

pub struct Args {
    pub source: PathBuf,
    pub grammar: PathBuf,
}

impl Args {
    pub fn parse() -> Self {
        let mut args = env::args().skip(1).peekable();
        if args.peek().is_none() {
            Self::usage();
        }

        let mut source = None;
        let mut grammar = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-x" => match args.next() {
                    Some(path) => source = Some(PathBuf::from(path)),
                    None => Self::usage(),
                },
                "-g" => match args.next() {
                    Some(path) => grammar = Some(PathBuf::from(path)),
                    None => Self::usage(),
                },
                _ => Self::usage(),
            }
        }

        let (Some(source), Some(grammar)) = (source, grammar) else {
            Self::usage()
        };
        Self { source, grammar }
    }

    fn usage() -> ! {
        let cmd0 = env::args().next().unwrap_or("compiler".to_owned());
        println!("Usage: {cmd0} -x <source-path> -g <grammar-path>");
        print!(concat!(
            "\n",
            "Analyzes a C-like source file with the LR(1) grammar and writes\n",
            "into the current directory:\n",
            "  Lex_token_stream.txt   the token stream\n",
            "  Lr1_table.txt          the ACTION/GOTO tables\n",
            "  Lr1_process.txt        the parse trace\n",
            "  inter_code.txt         the intermediate code\n",
        ));
        exit(0)
    }
}
