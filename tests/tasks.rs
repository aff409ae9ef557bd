use std::{collections::HashSet, fs, path::Path};

use fewshot_tasks::{
    datasets::{DatasetBundle, Example, LoaderError},
    resolve, FewShotSampler, TaskConfig, TaskError,
};

fn write_json_lines(path: &Path, rows: &[(String, usize)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let body: String = rows
        .iter()
        .map(|(text, label)| format!("{}\n", serde_json::json!({"source": text, "label": label})))
        .collect();
    fs::write(path, body).unwrap();
}

fn rows(counts: &[usize]) -> Vec<(String, usize)> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(label, &n)| (0..n).map(move |i| (format!("label{label}-{i}"), label)))
        .collect()
}

#[test]
fn mr_end_to_end_from_data_dir() {
    let data = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    write_json_lines(&data.path().join("mr/train.json"), &rows(&[10, 3]));
    write_json_lines(&data.path().join("mr/test.json"), &rows(&[2, 2]));

    let config = TaskConfig::new(100, cache.path())
        .with_num_samples(10)
        .with_data_dir(data.path());
    let task = resolve("mr", config).unwrap();
    let bundle = task.get_datasets().unwrap();

    let train: Vec<_> = bundle["train"].iter().map(|e| e.label).collect();
    let dev: Vec<_> = bundle["validation"].iter().map(|e| e.label).collect();
    assert_eq!(train, vec![0, 0, 0, 0, 0, 1]);
    assert_eq!(dev, vec![0, 0, 0, 0, 0, 1]);
    assert_eq!(bundle["test"].len(), 4);

    let seen: HashSet<_> = bundle["train"].iter().filter_map(Example::source).collect();
    assert!(bundle["validation"]
        .iter()
        .filter_map(Example::source)
        .all(|s| !seen.contains(s)));
}

#[test]
fn same_seed_same_output_across_resolves() {
    let data = tempfile::tempdir().unwrap();
    write_json_lines(&data.path().join("trec/train.json"), &rows(&[9, 9, 9, 9, 9, 9]));
    write_json_lines(&data.path().join("trec/test.json"), &rows(&[1]));

    let run = |seed| {
        let config = TaskConfig::new(seed, data.path().join("cache"))
            .with_num_samples(3)
            .with_data_dir(data.path());
        resolve("trec", config).unwrap().get_datasets().unwrap()
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5)["train"], run(6)["train"]);
}

#[test]
fn anketa_remaps_sentinel_to_fallback_class() {
    let data = tempfile::tempdir().unwrap();
    let files = data.path().join("data_files");
    fs::create_dir_all(&files).unwrap();
    let mut train = String::from("comment,class_label\n");
    for (i, label) in [1, 1, -1, -1, 0, 0, 1, -1, 0].iter().enumerate() {
        train.push_str(&format!("comment {i},{label}\n"));
    }
    fs::write(files.join("data_train_192.csv"), &train).unwrap();
    fs::write(files.join("data_test_192.csv"), "comment,class_label\nx,-1\n").unwrap();

    let config = TaskConfig::new(0, data.path().join("cache"))
        .with_num_samples(1)
        .with_data_dir(data.path());
    let task = resolve("anketa", config).unwrap();

    let raw = task.load().unwrap();
    assert_eq!(raw["test"], [Example::from_source("x", 2)]);

    let sampled = task.get_datasets().unwrap();
    let labels: Vec<_> = sampled["train"].iter().map(|e| e.label).collect();
    assert_eq!(labels, vec![0, 1, 2]);
}

#[test]
fn anketa_binary_folds_sentinel_into_negative_class() {
    let data = tempfile::tempdir().unwrap();
    let files = data.path().join("data_files");
    fs::create_dir_all(&files).unwrap();
    fs::write(files.join("data_train_128_2.csv"), "comment,class_label\na,-1\nb,1\n").unwrap();
    fs::write(files.join("data_test_128_2.csv"), "comment,class_label\nc,0\n").unwrap();

    let config = TaskConfig::new(0, data.path().join("cache")).with_data_dir(data.path());
    let raw = resolve("anketa_binary", config).unwrap().load().unwrap();
    let labels: Vec<_> = raw["train"].iter().map(|e| e.label).collect();
    assert_eq!(labels, vec![0, 1]);
}

#[test]
fn missing_local_files_surface_as_loader_errors() {
    let data = tempfile::tempdir().unwrap();
    let config = TaskConfig::new(0, data.path().join("cache"))
        .with_num_samples(4)
        .with_data_dir(data.path());
    let err = resolve("subj", config).unwrap().get_datasets().unwrap_err();
    assert!(matches!(err, TaskError::Loader(LoaderError::Io { .. })));
}

#[test]
fn unknown_task_lists_registered_names() {
    let err = resolve("not_a_real_task", TaskConfig::default()).unwrap_err();
    for name in ["mr", "SST-2", "boolq", "emotion", "amazon_cf", "anketa_binary"] {
        assert!(err.valid.contains(&name));
        assert!(err.to_string().contains(name));
    }
}

#[test]
fn sampler_balance_property_over_many_seeds() {
    let counts = [13, 2, 7, 0, 40];
    let train: Vec<_> = rows(&counts)
        .into_iter()
        .map(|(text, label)| Example::from_source(text, label))
        .collect();
    for seed in 0..25 {
        let cap = (seed % 6) as usize;
        let out = FewShotSampler::new(counts.len(), cap, seed)
            .sample(DatasetBundle::new().with_split("train", train.clone()))
            .unwrap();
        let t = out.label_counts("train").unwrap();
        let v = out.label_counts("validation").unwrap();
        for (label, &available) in counts.iter().enumerate() {
            let expected = (available / 2).min(cap);
            assert_eq!(t.get(&label).copied().unwrap_or(0), expected);
            assert_eq!(v.get(&label).copied().unwrap_or(0), expected);
        }
        assert!(out["train"].len() <= counts.len() * cap);

        let mut last = 0;
        for ex in out["train"].iter() {
            assert!(ex.label >= last, "train must be grouped by ascending label");
            last = ex.label;
        }
    }
}
