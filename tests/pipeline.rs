use std::fs;
use std::path::PathBuf;

use gb_instrgen::normalize::normalize;
use gb_instrgen::table::parse_table;
use gb_instrgen::{render, run, Anchors, GenConfig, GenError, Instr};
use pretty_assertions::assert_eq;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn template() -> String {
    fs::read_to_string(data("instruction-set-draft.cpp")).unwrap()
}

fn set() -> Vec<Instr> {
    let text = fs::read_to_string(data("instruction-data.json")).unwrap();
    normalize(parse_table(&text).unwrap()).unwrap()
}

fn rendered() -> String {
    render(&template(), &set(), &Anchors::default()).unwrap().0
}

#[test]
fn report_counts() {
    let (_, report) = render(&template(), &set(), &Anchors::default()).unwrap();
    assert_eq!(report.defined, 501);
    assert_eq!(report.undefined, 11);
    assert_eq!(report.excluded, 5);
    assert_eq!(report.cases, 512 - 11 - 5);
}

#[test]
fn anchors_are_consumed() {
    let out = rendered();
    let anchors = Anchors::default();
    for marker in [&anchors.lengths, &anchors.disas, &anchors.cases] {
        assert!(!out.contains(marker.as_str()), "{marker} left in output");
    }
}

#[test]
fn length_table_is_spliced_with_anchor_indent() {
    let out = rendered();
    let start = out.find("instruction_length[256] =\n  {\n").unwrap();
    let rows: Vec<&str> = out[start..].lines().skip(2).take(16).collect();
    assert_eq!(rows[0], "    1, 3, 1, 1, 1, 1, 2, 1, 3, 1, 1, 1, 1, 1, 2, 1,");
    // 0xd3, 0xdb, 0xdd are UNDEF
    assert_eq!(rows[13], "    1, 1, 3, 0, 3, 1, 2, 1, 1, 1, 3, 0, 3, 0, 2, 1,");
    assert_eq!(rows[15], "    2, 1, 2, 1, 0, 1, 2, 1, 2, 1, 3, 1, 0, 0, 2, 1");
    assert!(out.contains("2, 1\n  };\n\n  const char *disas_table[512]"));
}

#[test]
fn disas_table_lists_every_opcode() {
    let out = rendered();
    let start = out.find("disas_table[512] =\n  {\n").unwrap();
    let rows: Vec<&str> = out[start..].lines().skip(2).take(512).collect();
    assert_eq!(rows[0], "    \"NOP \",");
    assert_eq!(rows[0x07], "    \"RLC A\",");
    assert_eq!(rows[0x90], "    \"SUB B\",");
    assert_eq!(rows[0xd3], "    \"UNDEF\",");
    assert_eq!(rows[0x1ff], "    \"SET 7,A\"");
    assert!(out.contains("    \"SET 7,A\"\n  };"));
}

#[test]
fn generated_cases_match_hand_checked_bodies() {
    let out = rendered();
    for block in [
        "      case 0x7: // RLC A\n      reg.a() = RLC(reg.a());\n      clocks = 4;\n      break;\n",
        "      case 0x3a: // LD A,(HL-)\n      reg.a() = mem_ref(reg.hl()--);\n      clocks = 8;\n",
        "      case 0x96: // SUB (HL)\n      reg.a() = SUB(reg.a(), mem_ref(reg.hl()));\n",
        "      case 0xe2: // LD (C),A\n      mem_ref(0xff00 + reg.c()) = reg.a();\n",
        "      case 0xf0: // LDH A,(a8)\n      reg.a() = mem_ref(0xff00 + opr8);\n      clocks = 12;\n",
        "      case 0xfe: // CP d8\n      CP(reg.a(), opr8);\n      clocks = 8;\n",
        "      case 0xff: // RST 38H\n      RST(0x38);\n      clocks = 16;\n",
        "      case 0x146: // BIT 0,(HL)\n      BIT(0, mem_ref(reg.hl()));\n      clocks = 16;\n",
        "      case 0xcd: // CALL a16\n      CALL(opr16);\n      clocks = 24;\n",
    ] {
        assert!(out.contains(block), "missing:\n{block}");
    }
}

#[test]
fn conditional_transfers_charge_per_branch() {
    let out = rendered();
    let jr = "      case 0x20: // JR NZ,r8
      if (NZ())
      {
        JR(opr8);
        clocks = 12;
      }
      else
        clocks = 8;
      break;
";
    assert!(out.contains(jr));
    let ret = "      case 0xd8: // RET C
      if (C())
      {
        RET();
        clocks = 20;
      }
      else
        clocks = 8;
";
    assert!(out.contains(ret));
}

#[test]
fn undef_slots_are_inert_comments() {
    let out = rendered();
    assert!(out.contains("      // case 0xd3: // UNDEF\n"));
    assert!(!out.contains("      case 0xd3:"));
}

#[test]
fn hand_written_cases_are_untouched() {
    let tpl = template();
    let out = rendered();
    let from = tpl.find("      // case 0xcb: // See above").unwrap();
    let to = tpl.find("      /*--- More cases").unwrap();
    let hand = tpl[from..to].trim_end_matches('\n');
    assert!(out.contains(hand));
    for op in ["0x08", "0xcb", "0xd9", "0xe8", "0xf8"] {
        assert_eq!(out.matches(&format!("case {op}:")).count(), 1, "{op}");
    }
    assert!(!out.contains("case 0x8:"));
    assert!(out.ends_with("      default:\n      return -1;\n    }\n\n    return clocks;\n  }\n\n};\n"));
}

#[test]
fn run_is_deterministic_and_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = GenConfig {
        table: data("instruction-data.json"),
        template: data("instruction-set-draft.cpp"),
        output: dir.path().join("instruction-set.cpp"),
        anchors: Anchors::default(),
    };
    run(&cfg).unwrap();
    let first = fs::read_to_string(&cfg.output).unwrap();
    run(&cfg).unwrap();
    let second = fs::read_to_string(&cfg.output).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, rendered());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn failed_run_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let text = fs::read_to_string(data("instruction-data.json")).unwrap();
    let broken = text.replacen(r#""operand": "BC,d16""#, r#""operand": "BC,d24""#, 1);
    assert_ne!(broken, text);
    let table = dir.path().join("broken.json");
    fs::write(&table, broken).unwrap();

    let output = dir.path().join("instruction-set.cpp");
    fs::write(&output, "previous build").unwrap();
    let cfg = GenConfig {
        table,
        template: data("instruction-set-draft.cpp"),
        output: output.clone(),
        anchors: Anchors::default(),
    };
    let err = run(&cfg).unwrap_err();
    assert!(matches!(err, GenError::UnknownOperand { opcode: 0x01, ref token } if token == "d24"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous build");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn missing_anchor_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = dir.path().join("draft.cpp");
    fs::write(&tpl, template().replace("/*--- The disas will go here ---*/", "")).unwrap();
    let cfg = GenConfig {
        table: data("instruction-data.json"),
        template: tpl,
        output: dir.path().join("out.cpp"),
        anchors: Anchors::default(),
    };
    assert!(matches!(run(&cfg), Err(GenError::AnchorNotFound { .. })));
    assert!(!cfg.output.exists());
}
