use std::io::Read;

use serde::Deserialize;
use thiserror::Error;
use xmin_core::model::grid::{GridCell, GridStore};

#[derive(Error, Debug)]
pub enum GridReadError {
    #[error("failure opening grid table {0}: {1}")]
    IoError(String, std::io::Error),
}

/// one raw table row. every column is read as text first: the source data
/// is census-export quality, and a malformed value in one column must not
/// take the row (or the load) down with it.
#[derive(Deserialize, Debug)]
struct RawGridRow {
    cell_id: String,
    x: String,
    y: String,
    #[serde(default)]
    population: String,
    #[serde(default)]
    district_id: String,
}

/// lenient row conversion: the centroid must parse finite or the row is
/// unusable; population and district coerce to absent on malformed values.
fn parse_cell(raw: &RawGridRow) -> Option<GridCell> {
    let x = raw.x.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    let y = raw.y.trim().parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(GridCell {
        cell_id: raw.cell_id.clone(),
        x,
        y,
        population: raw.population.trim().parse::<u32>().ok(),
        district_id: raw.district_id.trim().parse::<i64>().ok(),
    })
}

/// reads grid cells from any delimited source. rows that cannot be decoded
/// or have no usable centroid are dropped and logged; load order is
/// preserved and becomes the stable result order of grid queries.
pub fn read_grid_cells<R: Read>(reader: R, delimiter: u8) -> Vec<GridCell> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);
    let mut cells = Vec::new();
    for (line, result) in csv_reader.deserialize::<RawGridRow>().enumerate() {
        match result {
            Ok(raw) => match parse_cell(&raw) {
                Some(cell) => cells.push(cell),
                None => log::warn!(
                    "dropping grid row {}: cell_id={} has no usable centroid (x={:?}, y={:?})",
                    line + 1,
                    raw.cell_id,
                    raw.x,
                    raw.y
                ),
            },
            Err(e) => log::warn!("dropping undecodable grid row {}: {e}", line + 1),
        }
    }
    cells
}

pub fn load_grid_store(
    path: &str,
    delimiter: u8,
    cell_size_meters: f64,
) -> Result<GridStore, GridReadError> {
    let file = std::fs::File::open(path)
        .map_err(|e| GridReadError::IoError(String::from(path), e))?;
    let cells = read_grid_cells(file, delimiter);
    Ok(GridStore::new(cells, cell_size_meters))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
cell_id;x;y;population;district_id
c1;4321000.0;3210000.0;120;3
c2;4321100.0;3210000.0;;3
c3;not-a-number;3210000.0;50;3
c4;4321200.0;3210000.0;many;east
";

    #[test]
    fn test_reads_rows_with_lenient_coercion() {
        let cells = read_grid_cells(TABLE.as_bytes(), b';');
        // c3 has no usable centroid and is dropped
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].cell_id, "c1");
        assert_eq!(cells[0].population, Some(120));
        assert_eq!(cells[0].district_id, Some(3));
        // empty population coerces to absent
        assert_eq!(cells[1].population, None);
        // malformed population and district coerce to absent
        assert_eq!(cells[2].cell_id, "c4");
        assert_eq!(cells[2].population, None);
        assert_eq!(cells[2].district_id, None);
    }

    #[test]
    fn test_load_order_is_preserved() {
        let cells = read_grid_cells(TABLE.as_bytes(), b';');
        let ids = cells.iter().map(|c| c.cell_id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["c1", "c2", "c4"]);
    }
}
