//! CLI derivation from plain callable signatures.

use serde_json::json;
use sigil_core::{DeclaredType, Error, Param, Runner, Signature};

fn myls_signature() -> Signature {
    Signature::new("myls")
        .param(Param::new("paths", DeclaredType::list(DeclaredType::Str)))
        .param(
            Param::new("exclude", DeclaredType::list(DeclaredType::Str)).default_value(json!([])),
        )
        .param(Param::new("mystr", DeclaredType::optional(DeclaredType::Str)))
        .param(Param::new("follow_symlinks", DeclaredType::Bool).default_value(false))
}

#[test]
fn end_to_end_function_call() {
    let runner = Runner::from_fn(myls_signature(), |values| {
        let paths: Vec<String> = values.get("paths")?;
        let exclude: Vec<String> = values.get("exclude")?;
        let mystr: Option<String> = values.get("mystr")?;
        let follow_symlinks: bool = values.get("follow_symlinks")?;
        Ok((paths, exclude, mystr, follow_symlinks))
    })
    .unwrap();

    let (paths, exclude, mystr, follow_symlinks) =
        runner.try_run_from(["a", "b", "--exclude", "c"]).unwrap();
    assert_eq!(paths, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(exclude, vec!["c".to_string()]);
    assert_eq!(mystr, None);
    assert!(!follow_symlinks);
}

#[test]
fn scalar_params_without_defaults_are_required_positionals() {
    let signature = Signature::new("cp")
        .param(Param::new("source", DeclaredType::Str))
        .param(Param::new("dest", DeclaredType::Str));
    let runner = Runner::from_fn(signature, |values| {
        Ok((
            values.get::<String>("source")?,
            values.get::<String>("dest")?,
        ))
    })
    .unwrap();

    let (source, dest) = runner.try_run_from(["from.txt", "to.txt"]).unwrap();
    assert_eq!(source, "from.txt");
    assert_eq!(dest, "to.txt");

    // Dropping one of them is a parse failure, not a target failure.
    assert!(matches!(
        runner.try_run_from(["only.txt"]),
        Err(Error::Parse(_))
    ));
}

#[test]
fn defaulted_params_become_flags() {
    let signature = Signature::new("serve")
        .param(Param::new("root", DeclaredType::Str))
        .param(Param::new("port", DeclaredType::Int).default_value(8080))
        .param(Param::new("host", DeclaredType::Str).default_value("localhost"));
    let runner = Runner::from_fn(signature, |values| {
        Ok((
            values.get::<String>("root")?,
            values.get::<i64>("port")?,
            values.get::<String>("host")?,
        ))
    })
    .unwrap();

    let (root, port, host) = runner.try_run_from(["site"]).unwrap();
    assert_eq!((root.as_str(), port, host.as_str()), ("site", 8080, "localhost"));

    let (_, port, host) = runner
        .try_run_from(["site", "--port", "9000", "--host", "0.0.0.0"])
        .unwrap();
    assert_eq!((port, host.as_str()), (9000, "0.0.0.0"));
}

#[test]
fn bad_scalar_tokens_are_reported_by_the_parser() {
    let signature =
        Signature::new("t").param(Param::new("count", DeclaredType::Int).default_value(0));
    let runner = Runner::from_fn(signature, |values| values.get::<i64>("count")).unwrap();

    let error = runner.try_run_from(["--count", "three"]).unwrap_err();
    assert!(matches!(error, Error::Parse(_)));
    let text = error.to_string();
    assert!(text.contains("three"), "should name the offending token: {}", text);
}

#[test]
fn false_default_bool_flag_stores_true() {
    let signature = Signature::new("t")
        .param(Param::new("verbose", DeclaredType::Bool).default_value(false));
    let runner = Runner::from_fn(signature, |values| values.get::<bool>("verbose")).unwrap();

    assert!(!runner.try_run_from(Vec::<String>::new()).unwrap());
    assert!(runner.try_run_from(["--verbose"]).unwrap());
}

#[test]
fn undeclared_bool_behaves_like_false_default() {
    let signature = Signature::new("t").param(Param::new("verbose", DeclaredType::Bool));
    let runner = Runner::from_fn(signature, |values| values.get::<bool>("verbose")).unwrap();

    assert!(!runner.try_run_from(Vec::<String>::new()).unwrap());
    assert!(runner.try_run_from(["--verbose"]).unwrap());
}

#[test]
fn optional_param_without_value_is_null() {
    let signature =
        Signature::new("t").param(Param::new("tag", DeclaredType::optional(DeclaredType::Str)));
    let runner = Runner::from_fn(signature, |values| values.get::<Option<String>>("tag")).unwrap();

    assert_eq!(runner.try_run_from(Vec::<String>::new()).unwrap(), None);
    assert_eq!(
        runner.try_run_from(["--tag", "v1"]).unwrap(),
        Some("v1".to_string())
    );
}

#[test]
fn singular_list_flags_accept_both_spellings() {
    let signature = Signature::new("t")
        .singular_list_flags()
        .param(
            Param::new("excludes", DeclaredType::list(DeclaredType::Str))
                .default_value(json!([])),
        );
    let runner =
        Runner::from_fn(signature, |values| values.get::<Vec<String>>("excludes")).unwrap();

    assert_eq!(
        runner.try_run_from(["--exclude", "a", "b"]).unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
    assert_eq!(
        runner.try_run_from(["--excludes", "c"]).unwrap(),
        vec!["c".to_string()]
    );
}

#[test]
fn target_errors_propagate_unchanged() {
    let signature = Signature::new("t").param(Param::new("path", DeclaredType::Str));
    let runner = Runner::from_fn(signature, |values| -> sigil_core::Result<()> {
        let path: String = values.get("path")?;
        Err(anyhow::anyhow!("cannot open {}", path).into())
    })
    .unwrap();

    let error = runner.try_run_from(["missing.txt"]).unwrap_err();
    assert!(matches!(error, Error::Other(_)));
    assert_eq!(error.to_string(), "cannot open missing.txt");
}

#[test]
fn reruns_repeat_the_whole_cycle() {
    let signature = Signature::new("echo").param(Param::new("word", DeclaredType::Str));
    let runner = Runner::from_fn(signature, |values| values.get::<String>("word")).unwrap();

    assert_eq!(runner.try_run_from(["one"]).unwrap(), "one");
    assert_eq!(runner.try_run_from(["two"]).unwrap(), "two");
}
