// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. This
// is the only layer that prints to stdout.
//
//   1. `train`    - fit a model and checkpoint it every epoch
//   2. `evaluate` - test loss/accuracy of the latest checkpoint
//   3. `predict`  - sentiment of free text
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "sentiment-rnn",
    version,
    about = "Train embedding + RNN/LSTM sentiment classifiers on IMDB reviews."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on reviews in: {}", args.data_dir);
    let checkpoint_dir = args.checkpoint_dir.clone();
    let history = TrainUseCase::new(args.into()).execute()?;

    if let Some(last) = history.last() {
        println!(
            "Training complete after {} epochs: loss {:.4}, accuracy {:.1}%",
            last.epoch,
            last.train_loss,
            last.train_acc * 100.0
        );
    }
    println!("Checkpoint saved to '{}'.", checkpoint_dir);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let use_case = EvaluateUseCase::new(args.data_dir, args.checkpoint_dir, args.batch_size);
    let eval = use_case.execute()?;
    println!("Test loss: {:.4}", eval.loss);
    println!("Test accuracy: {:.2}%", eval.accuracy * 100.0);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;
    use crate::ml::InferBackend;

    let use_case = PredictUseCase::<InferBackend>::new(&args.checkpoint_dir, Default::default())?;
    for p in use_case.predict(&args.texts)? {
        println!("{:<8} {:.4}  {}", p.sentiment, p.probability, p.text);
    }
    Ok(())
}
