use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use transit_catalogue::application::process_document;
use transit_catalogue::infrastructure::{init_tracing, read_document, write_responses};

#[derive(Parser, Debug)]
#[command(version, about = "Answer stop, bus and route requests for a transit network")]
struct Args {
    #[arg(short, long, help = "Input JSON document; stdin when omitted")]
    input: Option<PathBuf>,
    #[arg(short, long, help = "Where to write the JSON answers; stdout when omitted")]
    output: Option<PathBuf>,
    #[arg(long, help = "Pretty-print the JSON answers")]
    pretty: bool,
    #[arg(short, long, help = "Log progress to stderr")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let reader: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let document = read_document(reader).context("reading input document")?;
    let responses = process_document(document)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    write_responses(writer, &responses, args.pretty)?;
    Ok(())
}
