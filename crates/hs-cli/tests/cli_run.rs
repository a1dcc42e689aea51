use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hmf2smf"))
}

fn repo_root() -> PathBuf {
    // crates/hs-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    repo_root().join("tests/fixtures").join(name)
}

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("hmf2smf_cli_{}_{}_{}", std::process::id(), nanos, name));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn floats(v: &serde_json::Value) -> Vec<f64> {
    v.as_array().unwrap().iter().map(|x| x.as_f64().unwrap()).collect()
}

#[test]
fn run_planck18_fixture_to_stdout() {
    let spec = fixture_path("pipeline_planck18.json");
    assert!(spec.exists(), "missing fixture: {}", spec.display());

    let out = run(&["run", "--input", spec.to_string_lossy().as_ref()]);
    assert!(
        out.status.success(),
        "run should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();

    assert_eq!(v["imf"], "salpeter");
    assert_eq!(v["redshift"].as_f64(), Some(7.0));
    let fb = v["baryon_fraction"].as_f64().unwrap();
    assert!((fb - 0.0490 / 0.3111).abs() < 1e-15);

    let sfe = floats(&v["sfe"]);
    let smf = floats(&v["smf"]);
    let expected_sfe = [2.52474688e-04, 1.04919512e-01, 9.81951986e-01];
    let masses = [1e7, 1e11, 1e15];
    for i in 0..3 {
        assert!((sfe[i] / expected_sfe[i] - 1.0).abs() < 1e-8, "sfe[{i}]={}", sfe[i]);
        assert!((smf[i] / (masses[i] * fb * sfe[i]) - 1.0).abs() < 1e-14);
    }
}

#[test]
fn run_writes_output_file_deterministically() {
    let spec = fixture_path("pipeline_kroupa_custom_cosmology.json");
    let out_a = tmp_path("run_a.json");
    let out_b = tmp_path("run_b.json");

    for path in [&out_a, &out_b] {
        let out = run(&[
            "run",
            "--input",
            spec.to_string_lossy().as_ref(),
            "--output",
            path.to_string_lossy().as_ref(),
        ]);
        assert!(
            out.status.success(),
            "run should succeed, stderr={}",
            String::from_utf8_lossy(&out.stderr)
        );
        assert!(out.stdout.is_empty(), "results go to the file, not stdout");
    }

    let a = std::fs::read(&out_a).unwrap();
    let b = std::fs::read(&out_b).unwrap();
    assert_eq!(a, b, "output should be deterministic for the same spec");

    let v: serde_json::Value = serde_json::from_slice(&a).unwrap();
    assert_eq!(v["imf"], "kroupa");
    assert!((v["baryon_fraction"].as_f64().unwrap() - 0.15).abs() < 1e-15);
    let rate = v["sn_rate"].as_f64().unwrap();
    assert!((rate / 0.012845638907782389 - 1.0).abs() < 1e-8, "rate={rate}");
    assert_eq!(floats(&v["smf"]).len(), 4);

    let _ = std::fs::remove_file(&out_a);
    let _ = std::fs::remove_file(&out_b);
}

#[test]
fn run_missing_redshift_fails() {
    let spec = fixture_path("pipeline_missing_redshift.json");
    let out = run(&["run", "--input", spec.to_string_lossy().as_ref()]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("redshift"), "stderr={stderr}");
}

#[test]
fn run_missing_input_file_fails() {
    let out = run(&["run", "--input", "/nonexistent/hmf2smf/spec.json"]);
    assert!(!out.status.success());
}
