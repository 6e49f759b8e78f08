use crate::catalog::{Catalog, DemandSite, DemandTruckLink, Economics, LinkKey, TruckSite};
use crate::constants::{
    DEMAND_NODE_FILE, DEMAND_NODE_HEADERS, DEMAND_TRUCK_FILE, DEMAND_TRUCK_HEADERS, PROBLEM_FILE,
    PROBLEM_HEADERS, TRUCK_NODE_FILE, TRUCK_NODE_HEADERS,
};
use crate::error::{PlannerError, Result};

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Folder holding the datasets of one (round, day) pair
pub fn data_folder<P: AsRef<Path>>(root: P, round: u32, day: u32) -> PathBuf {
    root.as_ref()
        .join(format!("round{round}"))
        .join(format!("day{day}"))
}

fn dataset_path(folder: &Path, round: u32, day: u32, suffix: &str) -> PathBuf {
    folder.join(format!("round{round}-day{day}_{suffix}"))
}

/// Reads the four datasets of a (round, day) pair into a validated catalog.
///
/// # Errors
/// Returns an error if a file is missing, a header does not match the
/// expected dataset layout, a numeric field fails to parse, or the
/// assembled catalog is inconsistent (duplicate ids, dangling links).
pub fn read_catalog<P: AsRef<Path>>(root: P, round: u32, day: u32) -> Result<Catalog> {
    let folder = data_folder(root, round, day);

    let economics = read_economics_from_reader(open(&dataset_path(
        &folder,
        round,
        day,
        PROBLEM_FILE,
    ))?)?;
    let trucks = read_truck_sites_from_reader(open(&dataset_path(
        &folder,
        round,
        day,
        TRUCK_NODE_FILE,
    ))?)?;
    let demands = read_demand_sites_from_reader(open(&dataset_path(
        &folder,
        round,
        day,
        DEMAND_NODE_FILE,
    ))?)?;
    let links = read_links_from_reader(open(&dataset_path(
        &folder,
        round,
        day,
        DEMAND_TRUCK_FILE,
    ))?)?;

    log::info!(
        "catalog loaded: {} truck sites, {} demand sites, {} reachable links",
        trucks.len(),
        demands.len(),
        links.len()
    );

    Catalog::new(economics, trucks, demands, links)
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|e| {
        PlannerError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Read the single-record economics dataset.
pub fn read_economics_from_reader<R: Read>(reader: R) -> Result<Economics> {
    let mut rdr = csv_reader(reader);
    validate_headers(&mut rdr, &PROBLEM_HEADERS)?;

    let mut records = rdr.records();
    let rec = records
        .next()
        .ok_or_else(|| PlannerError::Catalog("problem data contains no record".to_string()))??;

    let economics = Economics {
        burrito_price: parse_field(&rec, 0, "burrito_price", 2)?,
        ingredient_cost: parse_field(&rec, 1, "ingredient_cost", 2)?,
        truck_cost: parse_field(&rec, 2, "truck_cost", 2)?,
    };

    if records.next().is_some() {
        return Err(PlannerError::Catalog(
            "problem data contains more than one record".to_string(),
        ));
    }
    Ok(economics)
}

/// Read truck candidate sites (`index,x,y`).
pub fn read_truck_sites_from_reader<R: Read>(reader: R) -> Result<Vec<TruckSite>> {
    let mut rdr = csv_reader(reader);
    validate_headers(&mut rdr, &TRUCK_NODE_HEADERS)?;

    let mut sites = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2; // 1-indexed, +1 for the header
        if is_blank(&rec) {
            continue;
        }
        sites.push(TruckSite {
            id: get_column(&rec, 0, row, TRUCK_NODE_HEADERS.len())?.to_string(),
            x: parse_field(&rec, 1, "x", row)?,
            y: parse_field(&rec, 2, "y", row)?,
        });
    }
    Ok(sites)
}

/// Read demand sites (`index,x,y,demand`).
pub fn read_demand_sites_from_reader<R: Read>(reader: R) -> Result<Vec<DemandSite>> {
    let mut rdr = csv_reader(reader);
    validate_headers(&mut rdr, &DEMAND_NODE_HEADERS)?;

    let mut sites = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2;
        if is_blank(&rec) {
            continue;
        }
        sites.push(DemandSite {
            id: get_column(&rec, 0, row, DEMAND_NODE_HEADERS.len())?.to_string(),
            x: parse_field(&rec, 1, "x", row)?,
            y: parse_field(&rec, 2, "y", row)?,
            demand: parse_field(&rec, 3, "demand", row)?,
        });
    }
    Ok(sites)
}

/// Read demand-truck links, dropping unreachable pairs (scaled demand <= 0).
pub fn read_links_from_reader<R: Read>(reader: R) -> Result<Vec<(LinkKey, DemandTruckLink)>> {
    let mut rdr = csv_reader(reader);
    validate_headers(&mut rdr, &DEMAND_TRUCK_HEADERS)?;

    let mut links = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = i + 2;
        if is_blank(&rec) {
            continue;
        }
        let demand = get_column(&rec, 0, row, DEMAND_TRUCK_HEADERS.len())?.to_string();
        let truck = get_column(&rec, 1, row, DEMAND_TRUCK_HEADERS.len())?.to_string();
        let scaled_demand = parse_field(&rec, 2, "scaled_demand", row)?;

        if scaled_demand <= 0.0 {
            log::debug!("dropping unreachable link ({demand}, {truck}) at row {row}");
            continue;
        }
        links.push((LinkKey::new(demand, truck), DemandTruckLink { scaled_demand }));
    }
    Ok(links)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true) // allow additional columns
        .from_reader(reader)
}

/// Validates the header row against the expected dataset layout
fn validate_headers<R: Read>(rdr: &mut csv::Reader<R>, expected: &[&str]) -> Result<()> {
    let headers = rdr
        .headers()
        .map_err(|e| PlannerError::CsvHeader(format!("failed to read headers: {}", e)))?;

    for (idx, want) in expected.iter().enumerate() {
        let got = headers.get(idx).ok_or_else(|| {
            PlannerError::CsvHeader(format!("missing column '{}' at index {}", want, idx))
        })?;
        if !got.eq_ignore_ascii_case(want) {
            return Err(PlannerError::CsvHeader(format!(
                "expected '{}' in column {}, found '{}'",
                want, idx, got
            )));
        }
    }
    Ok(())
}

fn is_blank(rec: &StringRecord) -> bool {
    rec.iter().all(|f| f.trim().is_empty())
}

fn get_column<'a>(
    rec: &'a StringRecord,
    idx: usize,
    row: usize,
    expected: usize,
) -> Result<&'a str> {
    rec.get(idx).map(str::trim).ok_or(PlannerError::CsvRow {
        row,
        expected,
        got: rec.len(),
    })
}

fn parse_field(rec: &StringRecord, idx: usize, field: &'static str, row: usize) -> Result<f64> {
    let raw = get_column(rec, idx, row, idx + 1)?;
    raw.parse().map_err(|source| PlannerError::FieldParse {
        row,
        field,
        value: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn seed_round_day(root: &Path, round: u32, day: u32) -> PathBuf {
        let folder = data_folder(root, round, day);
        std::fs::create_dir_all(&folder).unwrap();
        let prefix = format!("round{round}-day{day}_");
        write_file(
            &folder,
            &format!("{prefix}{PROBLEM_FILE}"),
            "burrito_price,ingredient_cost,truck_cost\n5,2,50\n",
        );
        write_file(
            &folder,
            &format!("{prefix}{TRUCK_NODE_FILE}"),
            "index,x,y\nt1,0,0\nt2,10,10\n",
        );
        write_file(
            &folder,
            &format!("{prefix}{DEMAND_NODE_FILE}"),
            "index,x,y,demand\nd1,1,1,100\nd2,9,9,50\n",
        );
        write_file(
            &folder,
            &format!("{prefix}{DEMAND_TRUCK_FILE}"),
            "demand_node_index,truck_node_index,scaled_demand\nd1,t1,80\nd2,t2,40\nd1,t2,0\n",
        );
        folder
    }

    #[test]
    fn reads_full_catalog() {
        let tmp = TempDir::new().unwrap();
        seed_round_day(tmp.path(), 2, 5);

        let catalog = read_catalog(tmp.path(), 2, 5).unwrap();
        assert_eq!(catalog.economics().burrito_price, 5.0);
        assert_eq!(catalog.truck_sites().len(), 2);
        assert_eq!(catalog.demand_sites().len(), 2);
        // (d1, t2) has scaled_demand 0 and must not survive ingestion
        assert_eq!(catalog.links().len(), 2);
        assert!(catalog.links().contains_key(&LinkKey::new("d1", "t1")));
        assert!(!catalog.links().contains_key(&LinkKey::new("d1", "t2")));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = read_catalog(tmp.path(), 1, 1);
        assert!(matches!(result, Err(PlannerError::Io(_))));
    }

    #[test]
    fn rejects_unexpected_header() {
        let data = "price,ingredient_cost,truck_cost\n5,2,50\n";
        let result = read_economics_from_reader(data.as_bytes());
        assert!(matches!(result, Err(PlannerError::CsvHeader(_))));
    }

    #[test]
    fn economics_requires_exactly_one_record() {
        let none = "burrito_price,ingredient_cost,truck_cost\n";
        assert!(matches!(
            read_economics_from_reader(none.as_bytes()),
            Err(PlannerError::Catalog(_))
        ));

        let two = "burrito_price,ingredient_cost,truck_cost\n5,2,50\n4,1,30\n";
        assert!(matches!(
            read_economics_from_reader(two.as_bytes()),
            Err(PlannerError::Catalog(_))
        ));
    }

    #[test]
    fn negative_scaled_demand_is_dropped() {
        let data = "demand_node_index,truck_node_index,scaled_demand\nd1,t1,-3\nd1,t2,12\n";
        let links = read_links_from_reader(data.as_bytes()).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, LinkKey::new("d1", "t2"));
    }

    #[test]
    fn parse_error_reports_row_and_field() {
        let data = "index,x,y\nt1,zero,0\n";
        match read_truck_sites_from_reader(data.as_bytes()) {
            Err(PlannerError::FieldParse { row, field, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(field, "x");
                assert_eq!(value, "zero");
            }
            other => panic!("expected FieldParse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn blank_rows_are_skipped() {
        let data = "index,x,y\nt1,0,0\n,,\n";
        let sites = read_truck_sites_from_reader(data.as_bytes()).unwrap();
        assert_eq!(sites.len(), 1);
    }
}
