use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::{PathBuf,Path};
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

// Make a copy in temporary directory with the specified newline token.
// This insulates us against newline substitutions inserted by git or other layers.
// The starting newline must either be LF or CRLF.
fn copy_and_fix_newlines(in_file: PathBuf,temp_dir: &tempfile::TempDir,tok: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let txt = std::fs::read(in_file).expect("could not read input file");
    let mut new_txt: Vec<u8> = Vec::new();
    let mut last_char: u8 = 255;
    for i in 0..txt.len() {
        if txt[i]==13 || txt[i]==10 && last_char!=13 {
            new_txt.append(&mut tok.to_vec());
        }
        else if txt[i]!=10 {
            new_txt.push(txt[i]);
        }
        last_char = txt[i];
    }
    let new_txt_path = temp_dir.path().join("converted.txt");
    match std::fs::write(&new_txt_path,new_txt) {
        Ok(_) => Ok(new_txt_path),
        Err(e) => Err(Box::new(e))
    }
}

fn run(subcommand: &str,in_path: &Path,out_path: &Path) -> STDRESULT {
    Command::cargo_bin("huffpress")?
        .arg(subcommand)
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("{}ed",subcommand)));
    Ok(())
}

fn round_trip_test(base_name: &str,tok: &[u8]) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path_any_newline = Path::new("tests").join([base_name,".txt"].concat());
    let in_path = copy_and_fix_newlines(in_path_any_newline,&temp_dir,tok)?;
    let cmp_path = temp_dir.path().join([base_name,".huf"].concat());
    let out_path = temp_dir.path().join([base_name,".txt"].concat());
    run("compress",&in_path,&cmp_path)?;
    run("expand",&cmp_path,&out_path)?;
    match (std::fs::read(in_path),std::fs::read(cmp_path),std::fs::read(out_path)) {
        (Ok(v1),Ok(c),Ok(v2)) => {
            assert!(c.len() < v1.len());
            assert_eq!(v1,v2);
        },
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

#[test]
fn sonnet_round_trip() -> STDRESULT {
    round_trip_test("sonnet_18",&[10])?;
    round_trip_test("sonnet_18",&[13,10])
}

#[test]
fn small_file_bytes() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("small.txt");
    let cmp_path = temp_dir.path().join("small.huf");
    std::fs::write(&in_path,"aabbbcc")?;
    run("compress",&in_path,&cmp_path)?;
    let expected = hex::decode("07000000036102000000620300000063020000000D0F")?;
    assert_eq!(std::fs::read(&cmp_path)?,expected);
    Ok(())
}

#[test]
fn code_listing() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("small.txt");
    std::fs::write(&in_path,"aabbbcc")?;
    Command::cargo_bin("huffpress")?
        .arg("codes")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout("a 10\nb 0\nc 11\n");
    Ok(())
}

#[test]
fn empty_file_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("empty.txt");
    let cmp_path = temp_dir.path().join("empty.huf");
    std::fs::write(&in_path,"")?;
    Command::cargo_bin("huffpress")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&cmp_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("EmptyInput"));
    Ok(())
}

#[test]
fn corrupt_file_leaves_no_output() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let cmp_path = temp_dir.path().join("huge.huf");
    let out_path = temp_dir.path().join("huge.txt");
    // claims 2^32-1 symbols but holds a single bit
    std::fs::write(&cmp_path,hex::decode("FFFFFFFF0161FFFFFFFF03")?)?;
    Command::cargo_bin("huffpress")?
        .arg("expand")
        .arg("-i").arg(&cmp_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TruncatedStream"));
    assert!(!out_path.exists());
    Ok(())
}
