use minimax::cluster::{distance_matrix, Metric};
use minimax::{Protoclust, ProtoclustConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Four points on a line, plus a far-away pair.
    let points: Vec<Vec<f32>> = [0.0, 1.0, 2.0, 3.0, 20.0, 21.0]
        .iter()
        .map(|&x| vec![x])
        .collect();

    let d = distance_matrix(&points, Metric::Euclidean)?;
    let mut pc = Protoclust::from_array(d.view(), ProtoclustConfig::new().with_seed(0))?;

    // Drive the merges one at a time so progress can be reported.
    let total = pc.n_steps();
    for i in 0..total {
        pc.compute_index(i)?;
        println!("merge {}/{}", i + 1, total);
    }

    let dendro = pc.into_dendrogram()?;
    println!("Z =");
    for m in dendro.merges() {
        println!(
            "  [{:>2}, {:>2}, {:>5.2}, {}]",
            m.cluster_a, m.cluster_b, m.distance, m.size
        );
    }
    println!("exemplars = {:?}", dendro.exemplars());

    let p = dendro.cut_to_k(2);
    println!("labels = {:?}, prototypes = {:?}", p.labels, p.prototypes);
    Ok(())
}
