//! FASTA reading and writing for the command-line front end
//!
//! Headers are kept whole (everything after `>`), because pipe-delimited
//! metadata such as `name|state|date` is consumed downstream.
use crate::bio::sequence::AlignedSequence;
use crate::AlnDiffError;
use flate2::read::GzDecoder;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    IResult,
};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], String> {
    let (input, _) = tag(b">")(input)?;
    let (input, header) = map(not_line_ending, |s: &[u8]| {
        String::from_utf8_lossy(s).trim().to_string()
    })(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, header))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;

        // Skip stray carriage returns not consumed as line endings
        let rest = if rest.first() == Some(&b'\r') { &rest[1..] } else { rest };

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse FASTA records from bytes. Records with empty sequences are kept so
/// that alignment validation can report them.
pub fn parse_fasta_from_bytes(data: &[u8]) -> Result<Vec<AlignedSequence>, AlnDiffError> {
    let mut sequences = Vec::new();
    let mut remaining = data;

    loop {
        while let Some(c) = remaining.first() {
            if c.is_ascii_whitespace() {
                remaining = &remaining[1..];
            } else {
                break;
            }
        }

        if remaining.is_empty() {
            break;
        }

        if remaining[0] != b'>' {
            return Err(AlnDiffError::Parse(
                "expected '>' at the start of a FASTA record".to_string(),
            ));
        }

        let (rest, header) = parse_header(remaining)
            .map_err(|_| AlnDiffError::Parse("Failed to parse FASTA header".to_string()))?;
        let (rest, sequence) = parse_sequence(rest)
            .map_err(|_| AlnDiffError::Parse("Failed to parse FASTA sequence".to_string()))?;

        sequences.push(AlignedSequence::new(header, sequence));
        remaining = rest;
    }

    Ok(sequences)
}

/// Parse FASTA from any reader
pub fn read_fasta_from<R: Read>(mut reader: R) -> Result<Vec<AlignedSequence>, AlnDiffError> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    parse_fasta_from_bytes(&buffer)
}

/// Parse a FASTA file (supports .gz compression)
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<AlignedSequence>, AlnDiffError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        read_fasta_from(GzDecoder::new(BufReader::new(file)))
    } else {
        read_fasta_from(BufReader::new(file))
    }
}

/// Write sequences to any writer, one sequence line per record
pub fn write_fasta<W: Write>(writer: &mut W, sequences: &[AlignedSequence]) -> std::io::Result<()> {
    for seq in sequences {
        writeln!(writer, ">{}", seq.header)?;
        writer.write_all(&seq.sequence)?;
        writeln!(writer)?;
    }
    Ok(())
}
