use island_gp::prelude::*;

// Evolves a polynomial matching x^2 + 5x over the sample points 0..10.

fn eval(tree: &Tree<f64>, x: f64) -> f64 {
    match tree {
        Tree::Var(_) => x,
        Tree::Num(value) => *value,
        Tree::App(op, args) => {
            let a = eval(&args[0], x);
            let b = eval(&args[1], x);
            match op.as_str() {
                "+" => a + b,
                "-" => a - b,
                "*" => a * b,
                _ => f64::NAN,
            }
        }
    }
}

fn main() {
    let options = Options {
        iterations: 5,
        migrations: 10,
        num_islands: 2,
        population_size: 25,
        max_depth: 10,
        mutation_depth: 3,
        seed: 42,
        terminals: vec![Symbol::from("x")],
        numbers: (1..=5).map(f64::from).collect(),
        functions: vec![Op::new("+", 2), Op::new("-", 2), Op::new("*", 2)],
        ..Options::new(
            |module: &ModuleTree<f64>| {
                let error: f64 = (0..10)
                    .map(|i| {
                        let x = f64::from(i);
                        (eval(&module.body, x) - (x * x + 5.0 * x)).abs()
                    })
                    .sum();
                Ok(error)
            },
            |module: &ModuleTree<f64>, fitness: f64| {
                println!("best so far: {module} (error {fitness})");
            },
        )
    };

    match run(&options) {
        Ok(result) => println!(
            "finished: {} (error {}, {} evaluations)",
            result.best_tree, result.best_fitness, result.evaluations
        ),
        Err(err) => eprintln!("search failed: {err}"),
    }
}
