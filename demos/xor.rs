use neurite::data::generate_xor;
use neurite::{train_epoch, ActivationFunction, Network};

fn main() -> neurite::Result<()> {
    env_logger::init();

    let (inputs, targets) = generate_xor();

    let mut network: Network<f64> = Network::new();
    network.set_layer_sizes(&[2, 4, 1]);
    network.set_activation(ActivationFunction::Sigmoid);
    network.build()?;

    let learning_rate = 0.5;
    let epochs = 10_000;
    for epoch in 0..epochs {
        let loss = train_epoch(&mut network, &inputs, &targets, learning_rate)?;
        if epoch % 1000 == 0 {
            println!("epoch {epoch}: loss = {loss:.6}");
        }
    }

    for (input, target) in inputs.iter().zip(targets.iter()) {
        let output = network.predict(input)?;
        println!(
            "({}, {}) -> {:.4} (expected {})",
            input.get(0, 0),
            input.get(1, 0),
            output.get(0, 0),
            target.get(0, 0)
        );
    }

    network.save("xor.nnb")?;
    println!("model written to xor.nnb");
    Ok(())
}
