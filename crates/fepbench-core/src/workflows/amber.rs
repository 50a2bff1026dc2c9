use crate::engine::config::AmberTopologyConfig;
use crate::engine::tools::{ToolError, ToolInvocation, ToolRunner};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum AmberError {
    #[error("Input PDB file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Input path has no file name: {}", .0.display())]
    InvalidInput(PathBuf),
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{step} failed: {source}")]
    Tool {
        step: &'static str,
        #[source]
        source: ToolError,
    },
    #[error("{step} finished without producing {}", .path.display())]
    MissingOutput { step: &'static str, path: PathBuf },
}

/// Files produced by a topology preparation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmberOutputs {
    pub cleaned_pdb: PathBuf,
    pub leap_script: PathBuf,
    pub leap_pdb: PathBuf,
    pub topology: PathBuf,
    pub coordinates: PathBuf,
}

impl AmberOutputs {
    /// Output locations derived from the input file stem: `<stem>_pdb4amber.pdb` first,
    /// then `<stem>_pdb4amber_leap.pdb`, `.parmtop` and `.crd` from the second step.
    pub fn for_input(input_pdb: &Path, output_dir: &Path) -> Result<Self, AmberError> {
        let stem = input_pdb
            .file_stem()
            .ok_or_else(|| AmberError::InvalidInput(input_pdb.to_path_buf()))?
            .to_string_lossy();
        let cleaned_stem = format!("{}_pdb4amber", stem);
        Ok(Self {
            cleaned_pdb: output_dir.join(format!("{}.pdb", cleaned_stem)),
            leap_script: output_dir.join(format!("{}_leap.in", cleaned_stem)),
            leap_pdb: output_dir.join(format!("{}_leap.pdb", cleaned_stem)),
            topology: output_dir.join(format!("{}.parmtop", cleaned_stem)),
            coordinates: output_dir.join(format!("{}.crd", cleaned_stem)),
        })
    }
}

/// Double-quoted path for a tleap command, so directories with spaces stay one argument.
fn leap_path(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

/// Builds the tleap input that loads the cleaned structure and saves topology, coordinates
/// and the leap-processed PDB.
pub fn leap_script(force_fields: &[String], outputs: &AmberOutputs) -> String {
    let mut script = String::new();
    for ff in force_fields {
        script.push_str(&format!("source leaprc.{}\n", ff));
    }
    script.push_str(&format!("mol = loadpdb {}\n", leap_path(&outputs.cleaned_pdb)));
    script.push_str(&format!(
        "saveamberparm mol {} {}\n",
        leap_path(&outputs.topology),
        leap_path(&outputs.coordinates)
    ));
    script.push_str(&format!("savepdb mol {}\n", leap_path(&outputs.leap_pdb)));
    script.push_str("quit\n");
    script
}

fn pdb4amber_invocation(config: &AmberTopologyConfig, outputs: &AmberOutputs) -> ToolInvocation {
    let mut invocation = ToolInvocation::new(&config.pdb4amber_program)
        .arg("-i")
        .arg(&config.input_pdb)
        .arg("-o")
        .arg(&outputs.cleaned_pdb);
    if config.remove_hydrogens {
        invocation = invocation.arg("--nohyd");
    }
    if config.remove_waters {
        invocation = invocation.arg("--dry");
    }
    invocation
}

fn ensure_output(step: &'static str, path: &Path) -> Result<(), AmberError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AmberError::MissingOutput {
            step,
            path: path.to_path_buf(),
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, AmberError> {
    std::path::absolute(path).map_err(|source| AmberError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[instrument(skip_all, name = "amber_topology_workflow")]
pub fn run(
    config: &AmberTopologyConfig,
    runner: &impl ToolRunner,
) -> Result<AmberOutputs, AmberError> {
    if !config.input_pdb.is_file() {
        return Err(AmberError::InputNotFound(config.input_pdb.clone()));
    }
    fs::create_dir_all(&config.output_dir).map_err(|source| AmberError::Io {
        path: config.output_dir.clone(),
        source,
    })?;

    // tleap runs inside the output directory, so every path it sees is absolute.
    let input_pdb = absolute(&config.input_pdb)?;
    let output_dir = absolute(&config.output_dir)?;
    let outputs = AmberOutputs::for_input(&input_pdb, &output_dir)?;
    let config = AmberTopologyConfig {
        input_pdb,
        output_dir,
        ..config.clone()
    };

    // === Step 1: Structure clean-up ===
    info!("Running pdb4amber on {}.", config.input_pdb.display());
    runner
        .run(&pdb4amber_invocation(&config, &outputs))
        .map_err(|source| AmberError::Tool {
            step: "pdb4amber",
            source,
        })?;
    ensure_output("pdb4amber", &outputs.cleaned_pdb)?;

    // === Step 2: Topology and coordinate generation ===
    let script = leap_script(&config.force_fields, &outputs);
    fs::write(&outputs.leap_script, script).map_err(|source| AmberError::Io {
        path: outputs.leap_script.clone(),
        source,
    })?;
    info!(
        "Running tleap with force field(s) {}.",
        config.force_fields.join(", ")
    );
    let tleap = ToolInvocation::new(&config.tleap_program)
        .arg("-f")
        .arg(&outputs.leap_script)
        .current_dir(&config.output_dir);
    runner.run(&tleap).map_err(|source| AmberError::Tool {
        step: "tleap",
        source,
    })?;
    for path in [&outputs.leap_pdb, &outputs.topology, &outputs.coordinates] {
        ensure_output("tleap", path)?;
    }

    info!("Topology written to {}.", outputs.topology.display());
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::AmberTopologyConfigBuilder;
    use crate::engine::tools::ToolOutput;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use tempfile::tempdir;

    /// Records invocations and creates the files each tool is expected to write.
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<ToolInvocation>>,
        fail_tleap: bool,
        skip_outputs: bool,
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
            self.calls.borrow_mut().push(invocation.clone());
            let program = invocation.program.to_string_lossy().into_owned();
            if program == "tleap" && self.fail_tleap {
                return Err(ToolError::Failed {
                    command: invocation.command_line(),
                    status: "exit status: 1".to_string(),
                    stderr: "Could not open file leaprc.bogus".to_string(),
                });
            }
            if !self.skip_outputs {
                if program == "pdb4amber" {
                    let output = &invocation.args[3];
                    fs::write(output, "ATOM\n").unwrap();
                } else {
                    let script = fs::read_to_string(&invocation.args[1]).unwrap();
                    for line in script.lines() {
                        let command = line.split_whitespace().next().unwrap_or_default();
                        // Quoted arguments sit at the odd positions between quote marks.
                        let paths: Vec<&str> = line.split('"').skip(1).step_by(2).collect();
                        match (command, paths.as_slice()) {
                            ("saveamberparm", [top, crd]) => {
                                fs::write(top, "%VERSION\n").unwrap();
                                fs::write(crd, "\n").unwrap();
                            }
                            ("savepdb", [pdb]) => fs::write(pdb, "ATOM\n").unwrap(),
                            _ => {}
                        }
                    }
                }
            }
            Ok(ToolOutput::default())
        }
    }

    fn config(dir: &Path, ff: &str) -> AmberTopologyConfig {
        let input = dir.join("protein.pdb");
        fs::write(&input, "ATOM      1  N   ALA A   1\n").unwrap();
        AmberTopologyConfigBuilder::new()
            .input_pdb(input)
            .output_dir(dir.join("amber"))
            .force_field(ff)
            .build()
            .unwrap()
    }

    #[test]
    fn output_paths_follow_input_stem() {
        let outputs = AmberOutputs::for_input(Path::new("in/protein.pdb"), Path::new("out")).unwrap();
        assert_eq!(outputs.cleaned_pdb, PathBuf::from("out/protein_pdb4amber.pdb"));
        assert_eq!(outputs.leap_pdb, PathBuf::from("out/protein_pdb4amber_leap.pdb"));
        assert_eq!(outputs.topology, PathBuf::from("out/protein_pdb4amber.parmtop"));
        assert_eq!(outputs.coordinates, PathBuf::from("out/protein_pdb4amber.crd"));
    }

    #[test]
    fn leap_script_sources_every_force_field() {
        let outputs = AmberOutputs::for_input(Path::new("/w/p.pdb"), Path::new("/o")).unwrap();
        let script = leap_script(&["protein.ff14SB".to_string(), "water.tip3p".to_string()], &outputs);
        assert_eq!(
            script,
            "source leaprc.protein.ff14SB\n\
             source leaprc.water.tip3p\n\
             mol = loadpdb \"/o/p_pdb4amber.pdb\"\n\
             saveamberparm mol \"/o/p_pdb4amber.parmtop\" \"/o/p_pdb4amber.crd\"\n\
             savepdb mol \"/o/p_pdb4amber_leap.pdb\"\n\
             quit\n"
        );
    }

    #[test]
    fn runs_pdb4amber_then_tleap() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "protein.ff14SB");
        let runner = RecordingRunner::default();

        let outputs = run(&config, &runner).unwrap();
        assert!(outputs.topology.is_file());
        assert!(outputs.coordinates.is_file());
        assert!(outputs.leap_pdb.is_file());

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, PathBuf::from("pdb4amber"));
        assert_eq!(calls[0].args.len(), 4);
        assert_eq!(calls[1].program, PathBuf::from("tleap"));
        assert_eq!(calls[1].working_dir.as_deref(), Some(outputs.leap_script.parent().unwrap()));
    }

    #[test]
    fn output_directory_with_spaces_is_kept_whole() {
        let dir = tempdir().unwrap();
        let config = AmberTopologyConfig {
            output_dir: dir.path().join("amber run 1"),
            ..config(dir.path(), "protein.ff14SB")
        };
        let runner = RecordingRunner::default();

        let outputs = run(&config, &runner).unwrap();
        assert!(outputs.topology.starts_with(dir.path().join("amber run 1")));
        assert!(outputs.topology.is_file());
        assert!(outputs.coordinates.is_file());
        assert!(outputs.leap_pdb.is_file());

        let script = fs::read_to_string(&outputs.leap_script).unwrap();
        let loadpdb = script.lines().find(|l| l.starts_with("mol = loadpdb")).unwrap();
        assert_eq!(
            loadpdb,
            format!("mol = loadpdb \"{}\"", outputs.cleaned_pdb.display())
        );
    }

    #[test]
    fn removal_flags_are_only_passed_when_requested() {
        let dir = tempdir().unwrap();
        let config = AmberTopologyConfig {
            remove_hydrogens: true,
            remove_waters: true,
            ..config(dir.path(), "protein.ff14SB")
        };
        let runner = RecordingRunner::default();
        run(&config, &runner).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(
            calls[0].args[4..],
            [OsString::from("--nohyd"), OsString::from("--dry")]
        );
    }

    #[test]
    fn missing_input_fails_before_any_tool_runs() {
        let dir = tempdir().unwrap();
        let config = AmberTopologyConfigBuilder::new()
            .input_pdb(dir.path().join("absent.pdb"))
            .output_dir(dir.path().join("amber"))
            .force_field("protein.ff14SB")
            .build()
            .unwrap();
        let runner = RecordingRunner::default();

        let error = run(&config, &runner).unwrap_err();
        assert!(matches!(error, AmberError::InputNotFound(_)));
        assert!(error.to_string().contains("Input PDB file not found"));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn tool_failure_carries_its_stderr() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "bogus");
        let runner = RecordingRunner {
            fail_tleap: true,
            ..Default::default()
        };

        let error = run(&config, &runner).unwrap_err();
        assert!(matches!(error, AmberError::Tool { step: "tleap", .. }));
        assert!(format!("{:?}", error).contains("leaprc.bogus"));
    }

    #[test]
    fn missing_tool_output_is_an_error() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "protein.ff14SB");
        let runner = RecordingRunner {
            skip_outputs: true,
            ..Default::default()
        };

        let error = run(&config, &runner).unwrap_err();
        assert!(matches!(error, AmberError::MissingOutput { step: "pdb4amber", .. }));
    }
}
