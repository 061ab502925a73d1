//! Grids as JSON: a nested array of cell bitmasks, top row first.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::errors::*;
use crate::grid::Grid;

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
        where S: Serializer
    {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<Grid, D::Error>
        where D: Deserializer<'de>
    {
        let rows = Vec::<Vec<u8>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(de::Error::custom)
    }
}

pub fn to_json(grid: &Grid) -> Result<String> {
    Ok(serde_json::to_string(grid)?)
}

/// Parse a grid, rejecting empty or ragged rows and unknown direction bits.
pub fn from_json(json: &str) -> Result<Grid> {
    let rows: Vec<Vec<u8>> = serde_json::from_str(json)?;
    Grid::from_rows(rows)
}

pub fn save_grid<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, grid)?;
    writer.flush()?;
    Ok(())
}

pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let reader = BufReader::new(File::open(path)?);
    let rows: Vec<Vec<u8>> = serde_json::from_reader(reader)?;
    Grid::from_rows(rows)
}


#[cfg(test)]
mod tests {

    use std::env;
    use std::fs;

    use quickcheck::quickcheck;

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
    use crate::generators::ALL_ALGORITHMS;
    use crate::units::{Height, Width};

    fn is_malformed(result: Result<Grid>) -> bool {
        match result {
            Err(Error(ErrorKind::MalformedGrid(_), _)) => true,
            _ => false,
        }
    }

    #[test]
    fn json_layout() {
        let mut g = Grid::new(Width(2), Height(2)).unwrap();
        g.carve(Cartesian2DCoordinate::new(0, 0), CompassPrimary::East).unwrap();
        g.carve(Cartesian2DCoordinate::new(1, 0), CompassPrimary::South).unwrap();
        g.carve(Cartesian2DCoordinate::new(0, 0), CompassPrimary::South).unwrap();
        assert_eq!(to_json(&g).unwrap(), "[[10,6],[1,1]]");
    }

    #[test]
    fn generated_mazes_survive_json() {
        fn p(w: u8, h: u8, seed: u64) -> bool {
            let (width, height) = (Width(w as usize % 20 + 1), Height(h as usize % 20 + 1));
            ALL_ALGORITHMS.iter().all(|algorithm| {
                let g = algorithm.generate(width, height, Some(seed)).unwrap();
                let json = to_json(&g).unwrap();
                let via_serde: Grid = serde_json::from_str(&json).unwrap();
                from_json(&json).unwrap() == g && via_serde == g && via_serde.to_rows() == g.to_rows()
            })
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }

    #[test]
    fn malformed_grids_are_rejected() {
        assert!(is_malformed(from_json("[]")));
        assert!(is_malformed(from_json("[[]]")));
        assert!(is_malformed(from_json("[[1, 2], [3]]")));
        assert!(is_malformed(from_json("[[16]]")));
        assert!(from_json("[[1, 2], [3, 300]]").is_err());
        assert!(from_json("not json").is_err());
        assert!(serde_json::from_str::<Grid>("[[2], [1, 0]]").is_err());
    }

    #[test]
    fn save_and_load() {
        let g = ALL_ALGORITHMS[0].generate(Width(5), Height(6), Some(99)).unwrap();
        let path = env::temp_dir().join(format!("perfect_mazes_grid_{}.json", std::process::id()));
        save_grid(&g, &path).unwrap();
        let loaded = load_grid(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), g);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        match load_grid("/this/path/does/not/exist.json") {
            Err(Error(ErrorKind::Io(_), _)) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }
}
