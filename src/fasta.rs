//! Very thin FASTA reader for the command-line driver.
//!
//! Sequence lines keep their spaces: the corrected reads of
//! fragment-producing correctors use a space as the fragment delimiter,
//! and the aligner strips it itself.
use std::io::{self, BufReader, Read};
use std::path::Path;

pub type Record = (String, Vec<u8>);

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("malformed FASTA: {}", msg))
}

/// Read and parse a whole FASTA file. Malformed input is an error, not a
/// silently shortened record list.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> io::Result<Vec<Record>> {
    let mut contents = vec![];
    std::fs::File::open(path)
        .map(BufReader::new)?
        .read_to_end(&mut contents)?;
    parse_fasta(&contents)
}

fn parse_fasta(contents: &[u8]) -> io::Result<Vec<Record>> {
    let mut chunks = contents.split(|&x| x == b'>');
    match chunks.next() {
        Some(head) if head.iter().all(|x| x.is_ascii_whitespace()) => {}
        _ => return Err(invalid("expected '>' before the first record")),
    }
    let mut records = vec![];
    for chunk in chunks {
        let mut lines = chunk.split(|&x| x == b'\n');
        let header = lines.next().ok_or_else(|| invalid("empty record"))?;
        let id = header.split(|&x| x == b' ').next().unwrap_or(header);
        if id.is_empty() {
            return Err(invalid("record without a name"));
        }
        let seq: Vec<u8> = lines
            .flat_map(|line| line.iter())
            .copied()
            .filter(|&x| x != b'\r')
            .collect();
        records.push((String::from_utf8_lossy(id).to_string(), seq));
    }
    Ok(records)
}
