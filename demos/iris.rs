use std::time::Instant;

use neurite::data::load_iris;
use neurite::{classification_accuracy, train_epoch, ActivationFunction, EpochStats, Network};

fn main() -> neurite::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "iris.csv".to_string());
    let (inputs, targets) = load_iris(&path)?;
    println!("loaded {} iris samples from {path}", inputs.len());

    let mut network: Network<f64> = Network::new();
    network.set_layer_sizes(&[4, 8, 3]);
    network.set_activation(ActivationFunction::Tanh);
    network.build()?;

    let learning_rate = 0.01;
    let total_epochs = 500;
    for epoch in 1..=total_epochs {
        let started = Instant::now();
        let mean_loss = train_epoch(&mut network, &inputs, &targets, learning_rate)?;
        if epoch % 50 == 0 {
            let stats = EpochStats {
                epoch,
                total_epochs,
                mean_loss,
                accuracy: Some(classification_accuracy(&network, &inputs, &targets)?),
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            println!(
                "epoch {}/{}: loss = {:.6}, accuracy = {:.1}%",
                stats.epoch,
                stats.total_epochs,
                stats.mean_loss,
                stats.accuracy.unwrap_or(0.0) * 100.0
            );
        }
    }

    network.save("iris.nnb")?;
    println!("model written to iris.nnb");
    Ok(())
}
