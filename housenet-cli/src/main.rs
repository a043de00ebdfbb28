use std::error::Error;
use std::path::Path;

use log::info;

use housenet::data::Frame;
use housenet::model::{Regressor, RegressorConfig, TARGET_COLUMN};

const TRAIN_CSV: &str = "housing.csv";
const EVAL_CSV: &str = "housing_eval.csv";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("kfold") => {
            let k: usize = args
                .get(2)
                .ok_or("usage: housenet kfold <k>")?
                .parse()
                .map_err(|_| "k must be a positive integer")?;
            k_fold(k)
        }
        Some(other) => Err(format!("unknown command {other:?}; usage: housenet [kfold <k>]").into()),
        None => train_and_evaluate(),
    }
}

/// Default mode: train on `housing.csv`, report RMSE, persist the model.
/// A previously saved model is loaded first so its pipeline and weights
/// seed the run; the eval CSV is optional.
fn train_and_evaluate() -> Result<(), Box<dyn Error>> {
    let table = Frame::read_csv(TRAIN_CSV)?;
    let (x, y) = table.split_target(TARGET_COLUMN)?;

    let eval = if Path::new(EVAL_CSV).exists() {
        let eval_table = Frame::read_csv(EVAL_CSV)?;
        Some(eval_table.split_target(TARGET_COLUMN)?)
    } else {
        None
    };

    let mut model = match Regressor::load(None) {
        Ok(model) => {
            info!("resuming from saved model");
            model
        }
        Err(_) => Regressor::new(&x, RegressorConfig::default())?,
    };

    match &eval {
        Some((ex, ey)) => model.fit(&x, &y, Some((ex, ey)))?,
        None => model.fit(&x, &y, None)?,
    }

    println!("train rmse: {:.2}", model.score(&x, &y)?);
    if let Some((ex, ey)) = &eval {
        println!("eval rmse:  {:.2}", model.score(ex, ey)?);
    }

    let path = model.save(None)?;
    info!("model saved to {}", path.display());
    Ok(())
}

/// Cross-validation mode: k contiguous folds over `housing.csv`, a fresh
/// model per fold, mean RMSE at the end.
fn k_fold(k: usize) -> Result<(), Box<dyn Error>> {
    if k < 2 {
        return Err("k must be at least 2".into());
    }
    let table = Frame::read_csv(TRAIN_CSV)?;
    let n = table.n_rows();
    if n < k {
        return Err(format!("{n} rows cannot form {k} folds").into());
    }

    let mut scores = Vec::with_capacity(k);
    for fold in 0..k {
        let lo = fold * n / k;
        let hi = (fold + 1) * n / k;
        let eval_chunk = table.slice_rows(lo, hi)?;

        let train_chunk = match (lo, hi) {
            (0, _) => table.slice_rows(hi, n)?,
            (_, h) if h == n => table.slice_rows(0, lo)?,
            _ => table.slice_rows(0, lo)?.concat(&table.slice_rows(hi, n)?)?,
        };

        let (x, y) = train_chunk.split_target(TARGET_COLUMN)?;
        let (ex, ey) = eval_chunk.split_target(TARGET_COLUMN)?;

        let mut model = Regressor::new(&x, RegressorConfig::default())?;
        model.fit(&x, &y, None)?;
        let rmse = model.score(&ex, &ey)?;
        println!("fold {}: rmse {:.2}", fold + 1, rmse);
        scores.push(rmse);
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    println!("mean rmse over {k} folds: {mean:.2}");
    Ok(())
}
