use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::StructureBuilder;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const MIN_COORDINATE_LINE_LENGTH: usize = 54;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: format!("{}-{}", start + 1, end),
                value: value.into(),
            },
        }),
    }
}

fn parse_optional_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        parse_float(line, line_num, start, end)
    }
}

fn optional_char(line: &str, column: usize) -> Option<char> {
    line.get(column..column + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut builder = StructureBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut atom_count = 0usize;

        let mut current_chain_id: Option<char> = None;
        let mut current_residue: Option<(isize, Option<char>, String)> = None;
        // (chain, resSeq, iCode, atom name) -> first alternate location seen for that atom
        let mut kept_alt_locs: HashMap<(char, isize, Option<char>, String), char> = HashMap::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_COORDINATE_LINE_LENGTH {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let name_str = slice_and_trim(&line, 12, 16);
                    let res_name_str = slice_and_trim(&line, 17, 20);
                    let res_seq_str = slice_and_trim(&line, 22, 26);

                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "7-11".into(),
                            value: serial_str.into(),
                        },
                    })?;
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let chain_id = optional_char(&line, 21).unwrap_or('A');
                    let insertion_code = optional_char(&line, 26);

                    if let Some(alt_loc) = optional_char(&line, 16) {
                        let kept = *kept_alt_locs
                            .entry((chain_id, res_seq, insertion_code, name_str.to_string()))
                            .or_insert(alt_loc);
                        if kept != alt_loc {
                            continue;
                        }
                    }

                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;
                    let occupancy = parse_optional_float(&line, line_num, 54, 60, 1.0)?;
                    let b_factor = parse_optional_float(&line, line_num, 60, 66, 0.0)?;
                    let element = slice_and_trim(&line, 76, 78);

                    if current_chain_id != Some(chain_id) {
                        builder.start_chain(chain_id);
                        current_chain_id = Some(chain_id);
                        current_residue = None;
                    }
                    let residue_key = (res_seq, insertion_code, res_name_str.to_string());
                    if current_residue.as_ref() != Some(&residue_key) {
                        builder.start_residue(
                            res_seq,
                            insertion_code,
                            res_name_str,
                            record_type == "HETATM",
                        );
                        current_residue = Some(residue_key);
                    }

                    let mut atom = Atom::new(serial, name_str, element, Point3::new(x, y, z));
                    atom.occupancy = occupancy;
                    atom.b_factor = b_factor;
                    builder.push_atom(atom);
                    atom_count += 1;
                }
                "TER" | "MODEL" | "CONECT" | "MASTER" | "ANISOU" | "SIGUIJ" | "SIGATM" => {}
                "ENDMDL" | "END" => break,
                _ => {
                    if !line.trim().is_empty() {
                        metadata.header_lines.push(line.clone());
                    }
                }
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((builder.build(), metadata))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        for chain in structure.chains() {
            let mut last = None;
            for residue in chain.residues() {
                let record_type = if residue.hetero { "HETATM" } else { "ATOM" };
                for atom in residue.atoms() {
                    writeln!(
                        writer,
                        "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        record_type,
                        atom.serial,
                        format_atom_name(&atom.name, &atom.element),
                        ' ',
                        residue.name,
                        chain.id,
                        residue.number,
                        residue.insertion_code.unwrap_or(' '),
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        atom.occupancy,
                        atom.b_factor,
                        atom.element,
                    )?;
                    last = Some((atom.serial, residue));
                }
            }
            if let Some((serial, residue)) = last {
                writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {}{:>4}{}",
                    serial + 1,
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                )?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_structure_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let default_metadata = PdbMetadata {
            header_lines: vec!["REMARK   1 GENERATED BY EVALPRO".to_string()],
        };
        Self::write_to(structure, &default_metadata, writer)
    }
}

// Four-character names and two-letter elements start in column 13, everything else in column 14.
fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() >= 4 || element.trim().len() == 2 {
        format!("{:<4}", name)
    } else {
        format!(" {:<3}", name)
    }
}
