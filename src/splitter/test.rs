use super::{Error, OffsetString, Preserve, SqlSplitter};
use crate::dialect::Dialect;

fn split(dialect: Dialect, script: &str) -> Vec<OffsetString> {
    SqlSplitter::new(dialect).unwrap().split(script)
}

fn texts(stmts: &[OffsetString]) -> Vec<&str> {
    stmts.iter().map(OffsetString::text).collect()
}

#[test]
fn two_statements() {
    let stmts = split(Dialect::Oracle, "select 1 from dual; select 2 from dual;");
    assert_eq!(
        vec!["select 1 from dual;", "select 2 from dual;"],
        texts(&stmts)
    );
    assert_eq!(0, stmts[0].offset());
    assert_eq!(20, stmts[1].offset());
}

#[test]
fn blank_input() {
    assert!(split(Dialect::MySql, "").is_empty());
    assert!(split(Dialect::MySql, " ").is_empty());
    assert!(split(Dialect::MySql, "\n\n").is_empty());
}

#[test]
fn empty_statements_are_dropped() {
    assert!(split(Dialect::MySql, ";;").is_empty());
    let stmts = split(Dialect::MySql, ";;select 1;");
    assert_eq!(vec!["select 1;"], texts(&stmts));
    assert_eq!(2, stmts[0].offset());
}

#[test]
fn tail_without_delimiter() {
    let stmts = split(Dialect::Oracle, "select 1;\nselect 2");
    assert_eq!(vec!["select 1;", "select 2"], texts(&stmts));
    assert_eq!(10, stmts[1].offset());
}

#[test]
fn delimiter_directive() {
    let mut splitter = SqlSplitter::new(Dialect::Oracle).unwrap();
    let stmts = splitter.split("delimiter $$\nselect 1 $$");
    assert_eq!(vec!["select 1 ;"], texts(&stmts));
    assert_eq!(13, stmts[0].offset());
    assert_eq!("$$", splitter.delimiter());
}

#[test]
fn delimiter_directive_variants() {
    for script in ["delimiter $", "delimiter $ ", "delimiter $\n", "DELIMITER $"] {
        let mut splitter = SqlSplitter::new(Dialect::MySql).unwrap();
        assert!(splitter.split(script).is_empty(), "{script:?}");
        assert_eq!("$", splitter.delimiter(), "{script:?}");
    }
}

#[test]
fn empty_directive_keeps_previous_delimiter() {
    let mut splitter = SqlSplitter::new(Dialect::MySql).unwrap();
    assert!(splitter.split("delimiter \n").is_empty());
    assert_eq!(";", splitter.delimiter());
}

#[test]
fn delimiter_survives_across_calls() {
    let mut splitter = SqlSplitter::new(Dialect::MySql).unwrap();
    assert!(splitter.split("delimiter $").is_empty());
    let stmts = splitter.split("select 3 $");
    assert_eq!(vec!["select 3 ;"], texts(&stmts));
}

#[test]
fn delimiter_changed_mid_script() {
    let stmts = split(
        Dialect::Oracle,
        "delimiter $\nselect 1 from dual $\ndelimiter ;\nselect 2 from dual;",
    );
    assert_eq!(
        vec!["select 1 from dual ;", "select 2 from dual;"],
        texts(&stmts)
    );
    assert_eq!(12, stmts[0].offset());
    assert_eq!(45, stmts[1].offset());
}

#[test]
fn custom_dollar_delimiter() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::Oracle, "$", Preserve::empty()).unwrap();
    let stmts = splitter.split("select 1 from dual $\nselect 2 from dual;");
    assert_eq!(
        vec!["select 1 from dual ;", "select 2 from dual;"],
        texts(&stmts)
    );
    assert_eq!(0, stmts[0].offset());
    assert_eq!(21, stmts[1].offset());
}

#[test]
fn line_comment_hides_delimiter() {
    for dialect in [Dialect::MySql, Dialect::Oracle] {
        let stmts = split(dialect, "select 1 from dual; -- ;\nselect 2 from dual;");
        assert_eq!(
            vec!["select 1 from dual;", "select 2 from dual;"],
            texts(&stmts),
            "{dialect:?}"
        );
        assert_eq!(25, stmts[1].offset());
    }
}

#[test]
fn leading_comment_and_whitespace_dropped() {
    let stmts = split(Dialect::Oracle, "-- comment\n\t select 1 from dual;");
    assert_eq!(vec!["select 1 from dual;"], texts(&stmts));
    assert_eq!(13, stmts[0].offset());
}

#[test]
fn hash_comment_mysql_only() {
    let stmts = split(Dialect::MySql, "select 1; # c\nselect 2;");
    assert_eq!(vec!["select 1;", "select 2;"], texts(&stmts));
    assert_eq!(14, stmts[1].offset());
    // Oracle has no # comments
    let stmts = split(Dialect::Oracle, "select 1 # 2;");
    assert_eq!(vec!["select 1 # 2;"], texts(&stmts));
}

#[test]
fn mysql_dash_comment_needs_a_gap() {
    let stmts = split(Dialect::MySql, "select 1 --2;");
    assert_eq!(vec!["select 1 --2;"], texts(&stmts));
    let stmts = split(Dialect::Oracle, "select 1 --2;");
    assert_eq!(vec!["select 1 "], texts(&stmts));
}

#[test]
fn block_comment_stripped() {
    let stmts = split(Dialect::Oracle, "select 1 /* c */ from dual;");
    assert_eq!(vec!["select 1  from dual;"], texts(&stmts));
}

#[test]
fn block_comment_preserved() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::Oracle, ";", Preserve::MULTI_COMMENTS).unwrap();
    let stmts = splitter.split("select 1 /* c */ from dual;");
    assert_eq!(vec!["select 1 /* c */ from dual;"], texts(&stmts));
}

#[test]
fn multiline_block_comment_stripped() {
    let stmts = split(Dialect::MySql, "select 1 /* a\nb */;\nselect 2;");
    assert_eq!(vec!["select 1 \n;", "select 2;"], texts(&stmts));
    assert_eq!(0, stmts[0].offset());
    assert_eq!(20, stmts[1].offset());
}

#[test]
fn trailing_block_comment_reattached() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::MySql, ";", Preserve::MULTI_COMMENTS).unwrap();
    let stmts = splitter.split("select 1;/* trailing */\nselect 2;");
    assert_eq!(
        vec!["select 1;/* trailing */", "select 2;"],
        texts(&stmts)
    );
    assert_eq!(24, stmts[1].offset());
}

#[test]
fn trailing_line_comment_reattached() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::MySql, ";", Preserve::SINGLE_COMMENTS).unwrap();
    let stmts = splitter.split("select 1;\n-- note\nselect 2;");
    assert_eq!(vec!["select 1;\n-- note\n", "select 2;"], texts(&stmts));
    assert_eq!(18, stmts[1].offset());

    let stmts = splitter.split("select 1; -- note\nselect 2;");
    assert_eq!(vec!["select 1;-- note\n", "select 2;"], texts(&stmts));
}

#[test]
fn leading_comment_preserved_opens_the_statement() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::MySql, ";", Preserve::SINGLE_COMMENTS).unwrap();
    let stmts = splitter.split("-- header\nselect 1;");
    assert_eq!(vec!["-- header\nselect 1;"], texts(&stmts));
    assert_eq!(0, stmts[0].offset());
}

#[test]
fn preserve_format_keeps_indentation() {
    let mut splitter =
        SqlSplitter::with_options(Dialect::MySql, ";", Preserve::FORMAT).unwrap();
    let stmts = splitter.split("  select 1;\n\tselect 2;");
    assert_eq!(vec!["  select 1;", "\tselect 2;"], texts(&stmts));
    assert_eq!(0, stmts[0].offset());
    assert_eq!(12, stmts[1].offset());
}

#[test]
fn block_hint_preserved_verbatim() {
    let stmts = split(Dialect::Oracle, "select /*+ index(t idx) */ 1 from dual;");
    assert_eq!(vec!["select /*+ index(t idx) */ 1 from dual;"], texts(&stmts));
}

#[test]
fn line_hint_suppresses_delimiter_to_eol() {
    let stmts = split(Dialect::Oracle, "select --+ hint ;\nfrom dual;");
    assert_eq!(vec!["select --+ hint ;\nfrom dual;"], texts(&stmts));
}

#[test]
fn conditional_block_preserved_in_mysql() {
    let stmts = split(Dialect::MySql, "/*!40101 SET @a=1 */;");
    assert_eq!(vec!["/*!40101 SET @a=1 */;"], texts(&stmts));
}

#[test]
fn conditional_marker_is_a_comment_in_oracle() {
    let stmts = split(Dialect::Oracle, "/*! x */ select 1;");
    assert_eq!(vec!["select 1;"], texts(&stmts));
    assert_eq!(9, stmts[0].offset());
}

#[test]
fn quotes_hide_delimiters() {
    let stmts = split(Dialect::MySql, "select 'a;b', \"c;d\", `e;f` from t;");
    assert_eq!(vec!["select 'a;b', \"c;d\", `e;f` from t;"], texts(&stmts));
}

#[test]
fn doubled_quote_reopens_the_string() {
    let stmts = split(Dialect::Oracle, "select 'a''b' from dual;");
    assert_eq!(vec!["select 'a''b' from dual;"], texts(&stmts));
}

#[test]
fn backslash_escape_in_mysql_strings() {
    let stmts = split(Dialect::MySql, "select 'a\\'b' from t;");
    assert_eq!(vec!["select 'a\\'b' from t;"], texts(&stmts));
}

#[test]
fn backslash_inert_in_backtick_identifiers() {
    let stmts = split(Dialect::MySql, "select `a\\` from t;");
    assert_eq!(vec!["select `a\\` from t;"], texts(&stmts));
}

#[test]
fn q_quote_bodies_are_opaque() {
    let stmts = split(Dialect::Oracle, "select q'[it's here]' from dual;");
    assert_eq!(vec!["select q'[it's here]' from dual;"], texts(&stmts));
    let stmts = split(Dialect::Oracle, "select q'(a;b)' from dual;");
    assert_eq!(vec!["select q'(a;b)' from dual;"], texts(&stmts));
    let stmts = split(Dialect::Oracle, "select q'xa;bx' from dual;");
    assert_eq!(vec!["select q'xa;bx' from dual;"], texts(&stmts));
}

#[test]
fn multibyte_text_keeps_byte_offsets() {
    let stmts = split(Dialect::MySql, "select 'é';select 2;");
    assert_eq!(vec!["select 'é';", "select 2;"], texts(&stmts));
    assert_eq!(12, stmts[1].offset());
}

#[test]
fn non_ascii_identifiers_do_not_look_like_keywords() {
    let stmts = split(Dialect::Oracle, "select xébegin from dual;\nselect 2;");
    assert_eq!(
        vec!["select xébegin from dual;", "select 2;"],
        texts(&stmts)
    );
}

#[test]
fn procedure_on_one_line_is_one_statement() {
    let stmts = split(
        Dialect::MySql,
        "CREATE PROCEDURE p() BEGIN IF x THEN y; END IF; END; /",
    );
    assert_eq!(
        vec!["CREATE PROCEDURE p() BEGIN IF x THEN y; END IF; END; /"],
        texts(&stmts)
    );
}

#[test]
fn oracle_procedure_slash_terminated() {
    let stmts = split(
        Dialect::Oracle,
        "CREATE PROCEDURE p AS\nBEGIN\n  IF x THEN\n    y;\n  END IF;\nEND;\n/",
    );
    assert_eq!(
        vec!["CREATE PROCEDURE p AS\nBEGIN\n  IF x THEN\n    y;\n  END IF;\nEND;"],
        texts(&stmts)
    );
    assert_eq!(0, stmts[0].offset());
}

#[test]
fn anonymous_blocks() {
    let stmts = split(
        Dialect::Oracle,
        "BEGIN\n  UPDATE t SET a = 1;\nEND;\n/\nBEGIN\n  NULL;\nEND;\n/\n",
    );
    assert_eq!(
        vec!["BEGIN\n  UPDATE t SET a = 1;\nEND;", "BEGIN\n  NULL;\nEND;"],
        texts(&stmts)
    );
    assert_eq!(0, stmts[0].offset());
    assert_eq!(35, stmts[1].offset());
}

#[test]
fn declare_block() {
    let stmts = split(
        Dialect::Oracle,
        "DECLARE\n  v NUMBER;\nBEGIN\n  v := 1;\nEND;\n/",
    );
    assert_eq!(
        vec!["DECLARE\n  v NUMBER;\nBEGIN\n  v := 1;\nEND;"],
        texts(&stmts)
    );
}

#[test]
fn mysql_procedure_with_directive() {
    let stmts = split(
        Dialect::MySql,
        "delimiter $$\nCREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND$$\ndelimiter ;\nSELECT 2;",
    );
    assert_eq!(
        vec!["CREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND;", "SELECT 2;"],
        texts(&stmts)
    );
    assert_eq!(13, stmts[0].offset());
    assert_eq!(70, stmts[1].offset());
}

#[test]
fn mysql_while_body() {
    let stmts = split(
        Dialect::MySql,
        "delimiter //\nCREATE PROCEDURE w()\nBEGIN\n  WHILE i < 10 DO\n    SET i = i + 1;\n  END WHILE;\nEND//",
    );
    assert_eq!(
        vec![
            "CREATE PROCEDURE w()\nBEGIN\n  WHILE i < 10 DO\n    SET i = i + 1;\n  END WHILE;\nEND;"
        ],
        texts(&stmts)
    );
}

#[test]
fn oracle_for_loop_body() {
    let stmts = split(
        Dialect::Oracle,
        "BEGIN\n  FOR i IN 1..3 LOOP\n    NULL;\n  END LOOP;\nEND;\n/",
    );
    assert_eq!(
        vec!["BEGIN\n  FOR i IN 1..3 LOOP\n    NULL;\n  END LOOP;\nEND;"],
        texts(&stmts)
    );
}

#[test]
fn case_block_in_pl() {
    let stmts = split(
        Dialect::Oracle,
        "BEGIN\n  CASE x WHEN 1 THEN NULL; END CASE;\nEND;\n/",
    );
    assert_eq!(
        vec!["BEGIN\n  CASE x WHEN 1 THEN NULL; END CASE;\nEND;"],
        texts(&stmts)
    );
}

#[test]
fn case_expression_in_plain_sql() {
    let stmts = split(Dialect::MySql, "select case when a=1 then 1 end as c from t;");
    assert_eq!(
        vec!["select case when a=1 then 1 end as c from t;"],
        texts(&stmts)
    );
}

#[test]
fn oracle_trigger() {
    let stmts = split(
        Dialect::Oracle,
        "CREATE OR REPLACE TRIGGER trg\nBEFORE INSERT ON t\nFOR EACH ROW\nBEGIN\n  :new.a := 1;\nEND;\n/",
    );
    assert_eq!(1, stmts.len());
    assert!(stmts[0].text().ends_with("END;"));
}

#[test]
fn package_body_with_nested_procedures() {
    let stmts = split(
        Dialect::Oracle,
        "CREATE OR REPLACE PACKAGE BODY pkg AS\n  PROCEDURE a IS\n  BEGIN\n    NULL;\n  END;\n  PROCEDURE b IS\n  BEGIN\n    NULL;\n  END b;\nEND pkg;\n/",
    );
    assert_eq!(1, stmts.len());
    assert!(stmts[0].text().ends_with("END pkg;"));
}

#[test]
fn slash_delimiter_skips_comment_tokens() {
    let mut splitter = SqlSplitter::with_options(Dialect::MySql, "/", Preserve::empty()).unwrap();
    let stmts = splitter.split("select /*c*/ 1 /\nselect 2 /");
    assert_eq!(vec!["select  1 ;", "select 2 ;"], texts(&stmts));
    assert_eq!(17, stmts[1].offset());
}

#[test]
fn unsupported_dialect_fails_at_construction() {
    match SqlSplitter::new(Dialect::Postgres) {
        Err(Error::UnsupportedDialect(Dialect::Postgres)) => {}
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn set_delimiter_between_calls() {
    let mut splitter = SqlSplitter::new(Dialect::MySql).unwrap();
    splitter.set_delimiter("§§");
    assert_eq!("§§", splitter.delimiter());
    let stmts = splitter.split("select 1 §§ select 2 §§");
    assert_eq!(vec!["select 1 ;", "select 2 ;"], texts(&stmts));
}
