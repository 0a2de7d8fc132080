use crate::core::race::RacePars;
use crate::core::vehicle::VehicleStats;
use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;

/// read_roster reads the vehicle roster CSV and decodes every row into VehicleStats.
/// Malformed numeric cells are coerced to 0.0 during deserialization, so a roster with
/// gaps still loads; only a structurally broken file is an error.
pub fn read_roster(filepath: &Path) -> anyhow::Result<Vec<VehicleStats>> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open roster file {}!",
            filepath.display()
        ))?;

    let mut csv_reader = csv::Reader::from_reader(&fh);
    let mut roster: Vec<VehicleStats> = vec![];

    for result in csv_reader.deserialize() {
        let stats: VehicleStats = result.context(format!(
            "Failed to parse roster file {}!",
            filepath.display()
        ))?;
        roster.push(stats);
    }

    if roster.is_empty() {
        anyhow::bail!("Roster file {} contains no vehicles!", filepath.display());
    }

    Ok(roster)
}

/// read_race_pars reads the JSON file and decodes the JSON string into the race
/// parameters struct. Missing fields fall back to the defaults.
pub fn read_race_pars(filepath: &Path) -> anyhow::Result<RacePars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open race parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse race parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut fh = std::fs::File::create(&path).unwrap();
        fh.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_roster_with_coercion() {
        let path = write_tmp(
            "dragsim_test_roster.csv",
            "name,horsepower,weight_lbs,top_speed_mph,acceleration_0_60\n\
             Car A,500,3000,200,3.0\n\
             Junker,N/A,2800,95,\n",
        );
        let roster = read_roster(&path).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Car A");
        assert_eq!(roster[0].horsepower, 500.0);
        assert_eq!(roster[1].horsepower, 0.0);
        assert_eq!(roster[1].zero_to_60, 0.0);
    }

    #[test]
    fn test_read_roster_missing_file() {
        assert!(read_roster(Path::new("does/not/exist.csv")).is_err());
    }

    #[test]
    fn test_read_race_pars_partial_file() {
        let path = write_tmp(
            "dragsim_test_race_pars.json",
            r#"{"timestep_size": 0.05, "max_racetime": 20.0}"#,
        );
        let pars = read_race_pars(&path).unwrap();
        assert_eq!(pars.timestep_size, 0.05);
        assert_eq!(pars.max_racetime, 20.0);
        // untouched fields keep their defaults
        assert_eq!(pars.sample_interval, 4);
        assert_eq!(pars.v_floor, 0.5);
    }
}
