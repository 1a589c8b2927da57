//! Parsing the gene, annotation and interaction tables
//!
//! All parsers read line by line from any [`BufRead`] source. The
//! `parse_file` functions open a path, files ending in `.gz` are
//! decompressed on the fly.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::{GoError, GoResult};

/// Opens a plain or gzipped text file
fn open<P: AsRef<Path>>(file: P) -> GoResult<Box<dyn BufRead>> {
    let path = file.as_ref();
    let filename = path.display().to_string();
    let handle = File::open(path).map_err(|_| GoError::CannotOpenFile(filename))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(handle))))
    } else {
        Ok(Box::new(BufReader::new(handle)))
    }
}

fn invalid_data(source: &str) -> GoError {
    GoError::InvalidInput(format!("Invalid data in {source}"))
}

/// Module to parse protein interactions from HuRI `HI-union.tsv`
///
/// Every line contains two Ensembl gene IDs, separated by a tab.
///
/// ```text
/// ENSG00000000005	ENSG00000061656
/// ENSG00000000005	ENSG00000099968
/// ```
pub mod interactome {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::{debug, error};

    use crate::identity::Identifier;
    use crate::interactome::Interactome;
    use crate::{GoError, GoResult};

    fn parse_line(line: &str) -> GoResult<Option<(&str, &str)>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut cols = line.split('\t');

        let Some(a) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };
        let Some(b) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };
        if a.is_empty() || b.is_empty() {
            return Err(GoError::InvalidInput(line.to_string()));
        }
        Ok(Some((a, b)))
    }

    /// Adds all interactions from `reader` to `interactome`
    ///
    /// Returns the number of added interactions
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidInput`] if a line does not contain two IDs
    pub fn parse<R: BufRead>(reader: R, interactome: &mut Interactome) -> GoResult<usize> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line.map_err(|_| super::invalid_data("interaction file"))?;
            let parsed = parse_line(&line).map_err(|err| {
                error!("Invalid interaction: {}", line);
                err
            })?;
            if let Some((a, b)) = parsed {
                interactome.add(Identifier::ensembl(a), Identifier::ensembl(b));
                count += 1;
            }
        }
        debug!("Parsed {} interactions", count);
        Ok(count)
    }

    /// Parses `HI-union.tsv` (or `HI-union.tsv.gz`)
    ///
    /// # Errors
    ///
    /// - [`GoError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GoError::InvalidInput`]: A line does not contain two IDs
    pub fn parse_file<P: AsRef<Path>>(file: P, interactome: &mut Interactome) -> GoResult<usize> {
        parse(super::open(file)?, interactome)
    }

}

/// Module to parse UniProt - Ensembl mappings from `idmapping_selected.tab`
///
/// The file has 22 tab separated columns without header. Column 1 is the
/// UniProtKB accession, column 19 the `; ` separated Ensembl gene IDs.
///
/// ```text
/// P06493	CDK1_HUMAN	983	NP_001307847.1	...	ENSG00000170312	ENST00000316629	ENSP00000316629
/// ```
pub mod idmapping {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::{debug, error, warn};

    use crate::identity::GeneRegistry;
    use crate::{GoError, GoResult};

    const ENSEMBL_COLUMN: usize = 18;

    struct Mapping<'a> {
        accession: &'a str,
        ensembl: Vec<&'a str>,
    }

    fn parse_line(line: &str) -> GoResult<Option<Mapping<'_>>> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        let mut cols = line.trim_end_matches(['\r', '\n']).split('\t');

        // Column 1 is the UniProtKB accession
        let Some(accession) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 19 are the Ensembl gene IDs
        let Some(ensembl) = cols.nth(ENSEMBL_COLUMN - 1) else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        let ensembl: Vec<&str> = ensembl
            .split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();

        Ok(Some(Mapping { accession, ensembl }))
    }

    /// Adds all UniProt - Ensembl links from `reader` to `registry`
    ///
    /// Returns the number of accessions with at least one Ensembl ID
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidInput`] if a line has less than 19 columns
    pub fn parse<R: BufRead>(reader: R, registry: &mut GeneRegistry) -> GoResult<usize> {
        let mut count = 0;
        let mut skipped = 0;
        for line in reader.lines() {
            let line = line.map_err(|_| super::invalid_data("idmapping_selected.tab"))?;
            let parsed = parse_line(&line).map_err(|err| {
                error!("Invalid idmapping line: {}", line);
                err
            })?;
            match parsed {
                Some(mapping) if mapping.ensembl.is_empty() => skipped += 1,
                Some(mapping) => {
                    registry.add_uniprot_mapping(mapping.accession, &mapping.ensembl);
                    count += 1;
                }
                None => {}
            }
        }
        if skipped > 0 {
            warn!("Skipped {} UniProt accessions without Ensembl ID", skipped);
        }
        debug!("Parsed {} UniProt to Ensembl mappings", count);
        Ok(count)
    }

    /// Parses `idmapping_selected.tab` (or `idmapping_selected.tab.gz`)
    ///
    /// # Errors
    ///
    /// - [`GoError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GoError::InvalidInput`]: A line has less than 19 columns
    pub fn parse_file<P: AsRef<Path>>(file: P, registry: &mut GeneRegistry) -> GoResult<usize> {
        parse(super::open(file)?, registry)
    }

    #[cfg(test)]
    mod test {
        use super::*;
        use crate::identity::{Identifier, IdentityResolver, Namespace};

        fn line(accession: &str, ensembl: &str) -> String {
            let mut cols = vec![""; 22];
            cols[0] = accession;
            cols[1] = "NAME_HUMAN";
            cols[ENSEMBL_COLUMN] = ensembl;
            cols.join("\t")
        }

        #[test]
        fn test_single_id() {
            let l = line("P06493", "ENSG00000170312");
            let mapping = parse_line(&l).unwrap().unwrap();
            assert_eq!(mapping.accession, "P06493");
            assert_eq!(mapping.ensembl, vec!["ENSG00000170312"]);
        }

        #[test]
        fn test_multiple_ids() {
            let l = line("Q00001", "ENSG1; ENSG2");
            let mapping = parse_line(&l).unwrap().unwrap();
            assert_eq!(mapping.ensembl, vec!["ENSG1", "ENSG2"]);
        }

        #[test]
        fn test_no_ensembl() {
            let l = line("Q00001", "");
            assert!(parse_line(&l).unwrap().unwrap().ensembl.is_empty());
        }

        #[test]
        fn test_short_line() {
            assert!(parse_line("P06493\tCDK1_HUMAN\t983").is_err());
        }

        #[test]
        fn test_parse_skips_missing_ensembl() {
            let text = format!("{}\n{}\n", line("P00001", "ENSG1"), line("P00002", ""));
            let mut registry = GeneRegistry::default();
            assert_eq!(parse(text.as_bytes(), &mut registry).unwrap(), 1);
            assert_eq!(
                registry
                    .resolve(&Identifier::uniprot("P00002"), Namespace::Ensembl)
                    .unwrap(),
                None
            );

            let text = format!("{}\nP00003\tNAME_HUMAN\n", line("P00001", "ENSG1"));
            assert!(matches!(
                parse(text.as_bytes(), &mut registry),
                Err(GoError::InvalidInput(_))
            ));
        }

        #[test]
        fn test_parse_file() {
            let mut registry = GeneRegistry::default();
            let count = parse_file("tests/data/idmapping_selected.tab", &mut registry).unwrap();
            assert_eq!(count, 5);
            assert_eq!(
                registry
                    .resolve(&Identifier::uniprot("P06493"), Namespace::Ensembl)
                    .unwrap(),
                Some(Identifier::ensembl("ENSG00000170312"))
            );
        }
    }
}

/// Module to parse HGNC genes from `hgnc_complete_set.txt`
///
/// The file has a header line; only the columns `symbol`, `name`,
/// `ensembl_gene_id` and `uniprot_ids` are used. Multiple UniProt IDs
/// are separated by `|`.
pub mod hgnc {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::{debug, error, trace};

    use crate::identity::GeneRegistry;
    use crate::{GoError, GoResult};

    /// Positions of the used columns
    #[derive(Debug, PartialEq, Eq)]
    struct Columns {
        symbol: usize,
        name: usize,
        ensembl: usize,
        uniprot: usize,
    }

    impl Columns {
        fn from_header(header: &str) -> GoResult<Self> {
            let names: Vec<&str> = header.trim_end().split('\t').collect();
            let find = |column: &str| {
                names.iter().position(|name| *name == column).ok_or_else(|| {
                    GoError::InvalidInput(format!("hgnc_complete_set.txt is missing column {column}"))
                })
            };
            Ok(Self {
                symbol: find("symbol")?,
                name: find("name")?,
                ensembl: find("ensembl_gene_id")?,
                uniprot: find("uniprot_ids")?,
            })
        }
    }

    struct HgncGene<'a> {
        symbol: &'a str,
        name: &'a str,
        ensembl: Option<&'a str>,
        uniprot: Vec<&'a str>,
    }

    fn parse_line<'a>(line: &'a str, columns: &Columns) -> GoResult<Option<HgncGene<'a>>> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        let cols: Vec<&str> = line
            .trim_end_matches(['\r', '\n'])
            .split('\t')
            .map(|col| col.trim_matches('"'))
            .collect();
        let get = |idx: usize| {
            cols.get(idx)
                .copied()
                .ok_or_else(|| GoError::InvalidInput(line.to_string()))
        };

        let symbol = get(columns.symbol)?;
        if symbol.is_empty() {
            return Err(GoError::InvalidInput(line.to_string()));
        }
        let ensembl = Some(get(columns.ensembl)?).filter(|id| !id.is_empty());
        let uniprot = get(columns.uniprot)?
            .split('|')
            .filter(|id| !id.is_empty())
            .collect();

        Ok(Some(HgncGene {
            symbol,
            name: get(columns.name)?,
            ensembl,
            uniprot,
        }))
    }

    /// Adds all HGNC genes from `reader` to `registry`
    ///
    /// Returns the number of genes
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidInput`] if the header or a line is invalid
    pub fn parse<R: BufRead>(mut reader: R, registry: &mut GeneRegistry) -> GoResult<usize> {
        let mut header = String::with_capacity(1024);
        reader
            .read_line(&mut header)
            .map_err(|_| super::invalid_data("hgnc_complete_set.txt"))?;
        let columns = Columns::from_header(&header)?;

        let mut count = 0;
        for line in reader.lines() {
            let line = line.map_err(|_| super::invalid_data("hgnc_complete_set.txt"))?;
            let parsed = parse_line(&line, &columns).map_err(|err| {
                error!("Invalid HGNC line: {}", line);
                err
            })?;
            if let Some(gene) = parsed {
                if gene.ensembl.is_none() {
                    trace!("No Ensembl ID for {}", gene.symbol);
                }
                registry.add_hgnc(gene.symbol, gene.name, gene.ensembl, &gene.uniprot);
                count += 1;
            }
        }
        debug!("Parsed {} HGNC genes", count);
        Ok(count)
    }

    /// Parses `hgnc_complete_set.txt`
    ///
    /// # Errors
    ///
    /// - [`GoError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GoError::InvalidInput`]: The header or a line is invalid
    pub fn parse_file<P: AsRef<Path>>(file: P, registry: &mut GeneRegistry) -> GoResult<usize> {
        parse(super::open(file)?, registry)
    }

    #[cfg(test)]
    mod test {
        use super::*;
        use crate::identity::{Identifier, IdentityResolver, Namespace};

        const HEADER: &str = "hgnc_id\tsymbol\tname\tlocus_group\tensembl_gene_id\tuniprot_ids";

        #[test]
        fn test_header() {
            let columns = Columns::from_header(HEADER).unwrap();
            assert_eq!(
                columns,
                Columns {
                    symbol: 1,
                    name: 2,
                    ensembl: 4,
                    uniprot: 5
                }
            );
            assert!(Columns::from_header("hgnc_id\tsymbol\tname").is_err());
        }

        #[test]
        fn test_line() {
            let columns = Columns::from_header(HEADER).unwrap();
            let line = "HGNC:1722\tCDK1\tcyclin dependent kinase 1\tprotein-coding gene\tENSG00000170312\t\"P06493|Q5H9N4\"";
            let gene = parse_line(line, &columns).unwrap().unwrap();
            assert_eq!(gene.symbol, "CDK1");
            assert_eq!(gene.name, "cyclin dependent kinase 1");
            assert_eq!(gene.ensembl, Some("ENSG00000170312"));
            assert_eq!(gene.uniprot, vec!["P06493", "Q5H9N4"]);
        }

        #[test]
        fn test_empty_fields() {
            let columns = Columns::from_header(HEADER).unwrap();
            let gene = parse_line("HGNC:1\tA1BG-AS1\tA1BG antisense RNA 1\tnon-coding RNA\t\t", &columns)
                .unwrap()
                .unwrap();
            assert!(gene.ensembl.is_none());
            assert!(gene.uniprot.is_empty());
        }

        #[test]
        fn test_short_line() {
            let columns = Columns::from_header(HEADER).unwrap();
            assert!(parse_line("HGNC:1\tA1BG", &columns).is_err());
        }

        #[test]
        fn test_parse_file() {
            let mut registry = GeneRegistry::default();
            let count = parse_file("tests/data/hgnc_small.txt", &mut registry).unwrap();
            assert_eq!(count, 6);
            assert_eq!(
                registry
                    .resolve(&Identifier::hgnc_symbol("CCNB1"), Namespace::Ensembl)
                    .unwrap(),
                Some(Identifier::ensembl("ENSG00000134057"))
            );
            let records = registry
                .gene_records(&Identifier::ensembl("ENSG00000134057"))
                .unwrap();
            assert_eq!(records[0].name(), "CCNB1");
            assert_eq!(records[0].description(), "cyclin B1");
        }
    }
}

/// Module to parse GO annotations from GAF files, e.g. `goa_human.gaf.gz`
///
/// Lines starting with `!` are comments. Annotations with a `NOT`
/// qualifier are skipped.
///
/// ```text
/// UniProtKB	P06493	CDK1		GO:0000278	PMID:123	IDA		P	Cyclin-dependent kinase 1	CDC2	protein	taxon:9606	20200101	UniProt
/// ```
pub mod gaf {
    use std::io::BufRead;
    use std::path::Path;

    use tracing::{debug, error, warn};

    use crate::annotations::{Annotation, AnnotationTable};
    use crate::identity::Identifier;
    use crate::{GoError, GoResult};

    const UNIPROT_DB: &str = "UniProtKB";

    struct GafLine<'a> {
        db: &'a str,
        object_id: &'a str,
        symbol: &'a str,
        go_id: &'a str,
        evidence: &'a str,
    }

    fn parse_line(line: &str) -> GoResult<Option<GafLine<'_>>> {
        if line.starts_with('!') || line.trim().is_empty() {
            return Ok(None);
        }
        let mut cols = line.split('\t');

        // Column 1 is the source database
        let Some(db) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 2 is the ID in the source database
        let Some(object_id) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 3 is the gene symbol
        let Some(symbol) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 4 are qualifiers, e.g. `NOT|enables`
        let Some(qualifier) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 5 is the GO term
        let Some(go_id) = cols.next() else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        // Column 7 is the evidence code
        let Some(evidence) = cols.nth(1) else {
            return Err(GoError::InvalidInput(line.to_string()));
        };

        if qualifier.split('|').any(|q| q == "NOT") {
            warn!("Skipping negated annotation {} {}", object_id, go_id);
            return Ok(None);
        }

        if go_id.is_empty() || evidence.is_empty() {
            return Err(GoError::InvalidInput(line.to_string()));
        }

        Ok(Some(GafLine {
            db,
            object_id,
            symbol,
            go_id,
            evidence,
        }))
    }

    /// Adds all annotations from `reader` to `table`
    ///
    /// UniProtKB rows are keyed by their accession, all other rows by
    /// their gene symbol. Returns the number of added annotations.
    ///
    /// # Errors
    ///
    /// [`GoError::InvalidInput`] if a line is invalid
    pub fn parse<R: BufRead>(reader: R, table: &mut AnnotationTable) -> GoResult<usize> {
        let mut count = 0;
        for line in reader.lines() {
            let line = line.map_err(|_| super::invalid_data("GAF file"))?;
            let parsed = parse_line(&line).map_err(|err| {
                error!("Invalid GAF line: {}", line);
                err
            })?;
            if let Some(gaf) = parsed {
                let identifier = if gaf.db == UNIPROT_DB {
                    Identifier::uniprot(gaf.object_id)
                } else {
                    Identifier::hgnc_symbol(gaf.symbol)
                };
                if table.add(Annotation::new(identifier, gaf.go_id, gaf.evidence, gaf.db)) {
                    count += 1;
                }
            }
        }
        debug!("Parsed {} annotations", count);
        Ok(count)
    }

    /// Parses a GAF file, plain or gzipped
    ///
    /// # Errors
    ///
    /// - [`GoError::CannotOpenFile`]: Source file not present or can't be opened
    /// - [`GoError::InvalidInput`]: A line is invalid
    pub fn parse_file<P: AsRef<Path>>(file: P, table: &mut AnnotationTable) -> GoResult<usize> {
        parse(super::open(file)?, table)
    }

}
