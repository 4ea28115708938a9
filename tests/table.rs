use std::fs;

use gb_instrgen::emit::{disas_table, length_table};
use gb_instrgen::normalize::{expand, normalize};
use gb_instrgen::operand;
use gb_instrgen::table::{load_table, RawEntry, TABLE_SIZE};
use gb_instrgen::{Category, GenError};

fn raw() -> Vec<RawEntry> {
    load_table(&std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data/instruction-data.json"))
        .unwrap()
}

#[test]
fn shipped_table_loads() {
    assert_eq!(raw().len(), TABLE_SIZE);
}

#[test]
fn undef_iff_no_mnemonic() {
    let raw = raw();
    let set = normalize(raw.clone()).unwrap();
    for (r, i) in raw.iter().zip(&set) {
        assert_eq!(i.is_undef(), r.opname.is_none(), "{:#x}", i.opcode);
    }
}

#[test]
fn implicit_accumulator_is_explicit_after_expansion() {
    let raw = raw();
    let set = normalize(raw.clone()).unwrap();
    for (r, i) in raw.iter().zip(&set) {
        if let Some("SUB" | "CP" | "OR" | "AND" | "XOR") = r.opname.as_deref() {
            assert_eq!(i.oprnum, 2);
            assert_eq!(i.opr1.as_deref(), Some("A"));
            assert_eq!(i.opr2.as_deref(), r.operand.as_deref());
        }
    }
    for i in set.iter().filter(|i| Category::of(&i.opname) == Some(Category::Arith)) {
        assert_eq!(i.oprnum, 2, "{:#x}", i.opcode);
        assert!(i.opr1.is_some());
    }
}

#[test]
fn expansion_is_not_reentrant() {
    let mut set = normalize(raw()).unwrap();
    assert!(matches!(expand(&mut set), Err(GenError::Invariant { .. })));
}

#[test]
fn every_operand_translates() {
    let set = normalize(raw()).unwrap();
    for i in set.iter().filter(|i| !i.is_undef()) {
        match Category::of(&i.opname) {
            Some(Category::Load | Category::Arith | Category::Compare) => {
                let (a, b) = (i.opr1.as_deref().unwrap(), i.opr2.as_deref().unwrap());
                if i.opcode != 0xf8 {
                    assert!(operand::translate(i.opcode, a).is_ok(), "{a}");
                    assert!(operand::translate(i.opcode, b).is_ok(), "{b}");
                }
            }
            Some(Category::Unary | Category::Stack) => {
                assert!(operand::translate(i.opcode, &i.operand).is_ok());
            }
            _ => {}
        }
    }
}

#[test]
fn length_and_disas_tables() {
    let raw = raw();
    let set = normalize(raw.clone()).unwrap();

    let lens: Vec<String> = length_table(&set)
        .iter()
        .flat_map(|r| {
            r.trim_end_matches(',')
                .split(", ")
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(lens.len(), 256);
    for (i, len) in set.iter().zip(&lens) {
        if i.is_undef() {
            assert_eq!(len, "0");
        } else {
            assert_eq!(len, &i.len);
        }
    }

    let disas = disas_table(&set);
    assert_eq!(disas.len(), TABLE_SIZE);
    for (i, row) in set.iter().zip(&disas) {
        let label = row.trim_end_matches(',');
        if i.is_undef() {
            assert_eq!(label, "\"UNDEF\"");
        } else {
            assert_eq!(label, format!("\"{} {}\"", i.opname, i.operand));
        }
    }
}

#[test]
fn malformed_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.json");
    fs::write(&path, "[{}, {}]").unwrap();
    assert!(matches!(load_table(&path), Err(GenError::MalformedTable { .. })));
    assert!(matches!(
        load_table(&dir.path().join("absent.json")),
        Err(GenError::Io { .. })
    ));
}
