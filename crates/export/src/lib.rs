//! Export helpers for CSV telemetry and JSON summaries.

pub mod telemetry {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    const HEADER: [&str; 11] = [
        "time_s",
        "chute",
        "state",
        "canopy_area_m2",
        "chute_force_n",
        "drag_time_s",
        "mach",
        "mean_throttle",
        "ram_drag",
        "loaded_intakes",
        "intake_force_n",
    ];

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// CSV writer over `writer`; the header is written explicitly with [`write_header`].
    pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer)
    }

    /// Write the standard telemetry CSV header.
    pub fn write_header<W: Write>(writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(HEADER)
    }

    /// One row per parachute per tick.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub time_s: f64,
        pub chute: &'a str,
        pub state: &'a str,
        pub canopy_area_m2: f64,
        pub chute_force_n: f64,
        pub drag_time_s: f64,
        pub mach: f64,
        pub mean_throttle: f64,
        pub ram_drag: f64,
        pub loaded_intakes: usize,
        pub intake_force_n: f64,
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the header ordering. Names are quoted as needed.
        pub fn write_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
            writer.write_record([
                format!("{:.3}", self.time_s),
                self.chute.to_string(),
                self.state.to_string(),
                format!("{:.6}", self.canopy_area_m2),
                format!("{:.6}", self.chute_force_n),
                format!("{:.3}", self.drag_time_s),
                format!("{:.4}", self.mach),
                format!("{:.4}", self.mean_throttle),
                format!("{:.6}", self.ram_drag),
                self.loaded_intakes.to_string(),
                format!("{:.6}", self.intake_force_n),
            ])
        }
    }
}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::{Path, PathBuf};

    /// A state change observed during the replay.
    #[derive(Debug, Clone, Serialize)]
    pub struct Transition {
        pub time_s: f64,
        pub chute: String,
        pub from: String,
        pub to: String,
    }

    /// A deployment failure observed during the replay.
    #[derive(Debug, Clone, Serialize)]
    pub struct Failure {
        pub time_s: f64,
        pub chute: String,
        pub reason: String,
    }

    /// End-of-run summary written next to the telemetry CSV.
    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary {
        pub scenario: String,
        pub generated_utc: String,
        pub ticks: usize,
        pub duration_s: f64,
        pub peak_chute_force_n: f64,
        pub peak_intake_force_n: f64,
        pub transitions: Vec<Transition>,
        pub failures: Vec<Failure>,
        pub final_states: Vec<(String, String)>,
    }

    /// Path of the summary sidecar for a telemetry file (`foo.csv` -> `foo_summary.json`).
    pub fn sidecar_path(output: &Path) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("telemetry");
        parent.join(format!("{}_summary.json", stem))
    }

    /// Write the JSON summary sidecar and return its path.
    pub fn write_sidecar(output: &Path, summary: &RunSummary) -> io::Result<PathBuf> {
        let path = sidecar_path(output);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(&path)?, summary)?;
        Ok(path)
    }
}
