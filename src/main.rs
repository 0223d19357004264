use clap::{App, Arg, SubCommand};
#[macro_use]
extern crate log;
use lrcalign::{AlignConfig, Variant};
use std::collections::HashMap;
use std::io::{BufWriter, Write};

fn subcommand_align() -> App<'static, 'static> {
    SubCommand::with_name("align")
        .version("0.1")
        .about("Three-way alignment of reference x uncorrected x corrected reads.")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Debug mode"),
        )
        .arg(
            Arg::with_name("reference")
                .long("reference")
                .short("r")
                .value_name("FASTA")
                .takes_value(true)
                .required(true)
                .help("Reference tracks, one record per read name. FASTA format."),
        )
        .arg(
            Arg::with_name("uncorrected")
                .long("uncorrected")
                .short("u")
                .value_name("FASTA")
                .takes_value(true)
                .required(true)
                .help("Uncorrected read tracks, aligned to the reference. FASTA format."),
        )
        .arg(
            Arg::with_name("corrected")
                .long("corrected")
                .short("c")
                .value_name("FASTA")
                .takes_value(true)
                .required(true)
                .help("Corrected reads, case-annotated. FASTA format."),
        )
        .arg(
            Arg::with_name("trimmed")
                .long("trimmed")
                .help("Corrected reads are space-delimited fragments (trimming correctors)."),
        )
        .arg(
            Arg::with_name("mismatch_penalty")
                .long("mismatch_penalty")
                .takes_value(true)
                .default_value("2")
                .help("Cost of a corrected base disagreeing with the reference."),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .value_name("FILE")
                .takes_value(true)
                .help("Output file. Defaults to stdout."),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .short("t")
                .takes_value(true)
                .default_value("1")
                .help("Number of threads"),
        )
}

fn align(matches: &clap::ArgMatches) -> std::io::Result<()> {
    let references = lrcalign::fasta::read_fasta(matches.value_of("reference").unwrap())?;
    let uncorrected = lrcalign::fasta::read_fasta(matches.value_of("uncorrected").unwrap())?;
    let corrected = lrcalign::fasta::read_fasta(matches.value_of("corrected").unwrap())?;
    let penalty: u32 = matches
        .value_of("mismatch_penalty")
        .and_then(|x| x.parse().ok())
        .unwrap_or(2);
    let variant = if matches.is_present("trimmed") {
        Variant::Trimmed
    } else {
        Variant::Untrimmed
    };
    let config = AlignConfig {
        mismatch_penalty: penalty,
    };
    let references: HashMap<_, _> = references.into_iter().collect();
    let uncorrected: HashMap<_, _> = uncorrected.into_iter().collect();
    let mut triples = vec![];
    for (name, corrected) in corrected {
        match (references.get(&name), uncorrected.get(&name)) {
            (Some(reference), Some(uncorrect)) => {
                triples.push((name, reference.clone(), uncorrect.clone(), corrected));
            }
            _ => warn!("no reference/uncorrected record named {}, skipped", name),
        }
    }
    debug!("aligning {} triples", triples.len());
    let batch: Vec<_> = triples
        .iter()
        .map(|(_, r, u, c)| (r.as_slice(), u.as_slice(), c.as_slice()))
        .collect();
    let results = lrcalign::align_batch(&batch, variant, &config);
    let mut wtr: BufWriter<Box<dyn Write>> = match matches.value_of("output") {
        Some(path) => BufWriter::new(Box::new(std::fs::File::create(path)?)),
        None => BufWriter::new(Box::new(std::io::stdout())),
    };
    let mut failed = 0;
    for ((name, _, _, _), result) in triples.iter().zip(results) {
        match result {
            Ok(aln) => {
                writeln!(wtr, "a name={} distance={}", name, aln.dist)?;
                writeln!(wtr, "r {}", String::from_utf8_lossy(&aln.reference))?;
                writeln!(wtr, "u {}", String::from_utf8_lossy(&aln.uncorrected))?;
                writeln!(wtr, "c {}", String::from_utf8_lossy(&aln.corrected))?;
                writeln!(wtr)?;
            }
            Err(why) => {
                // One bad triple should not sink the batch.
                error!("{}: {}", name, why);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        warn!("{} of {} triples failed", failed, triples.len());
    }
    wtr.flush()
}

fn main() -> std::io::Result<()> {
    let matches = App::new("lrcalign")
        .version("0.1")
        .about("Benchmarking alignments: [FASTA]x[FASTA]x[FASTA]->three-way alignment")
        .setting(clap::AppSettings::ArgRequiredElseHelp)
        .subcommand(subcommand_align())
        .get_matches();
    if let Some(sub_m) = matches.subcommand().1 {
        let level = match sub_m.occurrences_of("verbose") {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
        let threads: usize = sub_m
            .value_of("threads")
            .and_then(|x| x.parse().ok())
            .unwrap_or(1);
        if let Err(why) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            debug!("{:?}", why);
        }
    }
    debug!("Start");
    match matches.subcommand() {
        ("align", Some(sub_m)) => align(sub_m),
        _ => unreachable!(),
    }
}
