//! End-to-end runs of the three analyses against files on disk, the
//! way the binary drives them.

use std::fs;
use std::io::Cursor;

use anyhow::Result;
use service_timing::config::{SourceSpec, SourcesConfig};
use service_timing::release_log::ServiceTimes;
use service_timing::render::histogram::HistogramChart;
use service_timing::render::timeline::TimelineChart;
use service_timing::report::write_summary;
use service_timing::samples::SampleSet;

#[test]
fn csv_files_to_summary_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let run1 = dir.path().join("service_runs1_.csv");
    let run2 = dir.path().join("service_runs2_.csv");
    fs::write(&run1, "1.0\n2.0\n3.0\n")?;
    fs::write(&run2, "7.5\n")?;

    let sources = [
        SourceSpec {
            path: run1,
            label: "Camera Service".into(),
        },
        SourceSpec {
            path: run2,
            label: "Red Laser Service".into(),
        },
    ];
    let samples = SampleSet::read_sources(&sources)?;
    // total rows across inputs == sum of per-group counts
    assert_eq!(samples.num_samples(), 4);

    let mut out = Vec::new();
    write_summary(&samples, true, &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(text.contains("Camera Service\t3\t2.000000\t1.000000\t1.000000\t1.000000\t3.000000"));
    assert!(text.contains("Red Laser Service\t1\t7.500000\tNaN\tNaN"));
    Ok(())
}

#[test]
fn config_file_overrides_source_list() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data = dir.path().join("other.csv");
    fs::write(&data, "4.0\n5.0\n")?;
    let config = dir.path().join("sources.json5");
    fs::write(
        &config,
        format!(
            r#"{{ sources: [ {{ path: {:?}, label: "Other" }} ] }}"#,
            data.to_string_lossy()
        ),
    )?;

    let cfg = SourcesConfig::load_or_default(Some(&config), &[("unused.csv", "Unused")])?;
    let samples = SampleSet::read_sources(&cfg.sources)?;
    assert_eq!(samples.groups().len(), 1);
    assert_eq!(samples.get("Other").unwrap().values, [4.0, 5.0]);
    Ok(())
}

#[test]
fn histogram_svg_written() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut samples = SampleSet::new();
    for v in [1.0, 2.0, 2.0, 3.0, 4.5] {
        samples.push("Camera Service", v);
    }
    for v in [5.0, 6.0, 6.5] {
        samples.push("Red Laser Service", v);
    }

    let out = dir.path().join("service_hist.svg");
    HistogramChart::pair().save(&samples, &out)?;
    let svg_text = fs::read_to_string(&out)?;
    assert!(svg_text.contains("<svg"));
    assert!(svg_text.contains("Distribution for Camera Service"));
    Ok(())
}

#[test]
fn release_log_to_timing_diagram() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log = "\
scheduler starting\n\
RELEASE2: Service 1 at 0.100000000\n\
RELEASE2: Service 2 at 0.150000000\n\
RELEASE2: Service 1 at 0.200000000\n\
shutdown\n";
    let times = ServiceTimes::read_log(Cursor::new(log))?;
    assert_eq!(times.num_lanes(), 2);
    assert_eq!(times.num_events(), 3);

    let out = dir.path().join("service_timing.svg");
    TimelineChart::new().save(&times, &out)?;
    let svg_text = fs::read_to_string(&out)?;
    assert!(svg_text.contains("Service 1"));
    assert!(svg_text.contains("Service 2"));
    assert!(svg_text.contains("Time (ms)"));
    Ok(())
}

#[test]
fn empty_log_still_produces_a_diagram() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let times = ServiceTimes::read_log(Cursor::new("no events here\n"))?;
    assert!(times.is_empty());

    let out = dir.path().join("service_timing.svg");
    TimelineChart::new().save(&times, &out)?;
    assert!(fs::read_to_string(&out)?.contains("<svg"));
    Ok(())
}
