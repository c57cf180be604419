#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cluster::{minimax_linkage, Protoclust, ProtoclustConfig};
    use crate::Result;
    use ndarray::Array2;
    use proptest::prelude::*;

    fn seeded(seed: u64) -> ProtoclustConfig {
        ProtoclustConfig::new().with_seed(seed)
    }

    fn line(coords: &[f64]) -> Vec<Vec<f64>> {
        coords
            .iter()
            .map(|a| coords.iter().map(|b| (a - b).abs()).collect())
            .collect()
    }

    fn sorted_pair(a: usize, b: usize) -> (usize, usize) {
        (a.min(b), a.max(b))
    }

    /// Members of the available clusters must tile `0..n` exactly.
    fn assert_partition(pc: &Protoclust) {
        let n = pc.n_items();
        let mut seen = vec![false; n];
        for &id in pc.available() {
            for &p in pc.members(id).unwrap() {
                assert!(!seen[p], "point {p} in two available clusters");
                seen[p] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some point is in no available cluster");
    }

    #[test]
    fn test_three_points() -> Result<()> {
        // d(0,1)=1, d(0,2)=2, d(1,2)=3
        let d = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 3.0, 0.0],
        ];
        for seed in 0..8 {
            let mut pc = Protoclust::from_matrix(&d, seeded(seed))?;
            pc.compute()?;

            let first = pc.merges()[0];
            assert_eq!(sorted_pair(first.cluster_a, first.cluster_b), (0, 1));
            assert_eq!(first.distance, 1.0);
            assert_eq!(first.size, 2);
            assert!([0, 1].contains(&pc.exemplar(3).unwrap()));

            let root = pc.merges()[1];
            assert_eq!(sorted_pair(root.cluster_a, root.cluster_b), (2, 3));
            assert_eq!(root.distance, 2.0);
            assert_eq!(root.size, 3);
            assert_eq!(pc.exemplar(4), Some(0));
        }
        Ok(())
    }

    #[test]
    fn test_collinear_four() -> Result<()> {
        let d = line(&[0.0, 1.0, 2.0, 3.0]);
        for seed in 0..8 {
            let mut pc = Protoclust::from_matrix(&d, seeded(seed))?;
            pc.compute()?;

            assert_eq!(pc.merges()[0].distance, 1.0);
            assert_eq!(pc.members(6), Some(&[0, 1, 2, 3][..]));
            assert!([1, 2].contains(&pc.exemplar(6).unwrap()));
            assert_eq!(pc.merges()[2].distance, 2.0);
            assert_eq!(pc.available(), &[6]);
        }
        Ok(())
    }

    #[test]
    fn test_equal_distances_terminate() -> Result<()> {
        let n = 9;
        let mut pc = Protoclust::new(n, seeded(3))?;
        for i in 0..n {
            for j in 0..i {
                pc.set_distance(i, j, 1.0)?;
            }
        }
        pc.compute()?;
        let dendro = pc.into_dendrogram()?;
        assert_eq!(dendro.n_merges(), n - 1);
        assert!(dendro.distances().iter().all(|&h| h == 1.0));
        Ok(())
    }

    #[test]
    fn test_two_well_separated_groups() -> Result<()> {
        let d = line(&[0.0, 0.5, 1.0, 100.0, 100.5, 101.0]);
        let mut pc = Protoclust::from_matrix(&d, seeded(9))?;
        pc.compute()?;
        let dendro = pc.into_dendrogram()?;

        let p = dendro.cut_to_k(2);
        assert_eq!(p.labels, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(p.prototypes, vec![1, 4]);

        let root = dendro.root();
        assert_eq!(dendro.height(root), Some(100.0));
        assert_eq!(dendro.exemplar(root), Some(2));
        Ok(())
    }

    #[test]
    fn test_step_by_step_keeps_partition() -> Result<()> {
        let d = line(&[0.0, 3.0, 4.0, 9.0, 11.0, 20.0, 21.5]);
        let mut pc = Protoclust::from_matrix(&d, seeded(17))?;
        assert_partition(&pc);
        for i in 0..pc.n_steps() {
            pc.compute_index(i)?;
            assert_eq!(pc.available().len(), pc.n_items() - (i + 1));
            assert_partition(&pc);
        }
        Ok(())
    }

    #[test]
    fn test_dendrogram_matches_engine() -> Result<()> {
        let d = line(&[0.0, 2.0, 3.0, 7.0, 12.0]);
        let mut pc = Protoclust::from_matrix(&d, seeded(4))?;
        pc.compute()?;
        let z = pc.linkage_matrix();
        let exemplars = pc.exemplars().to_vec();
        let dendro = pc.into_dendrogram()?;
        assert_eq!(dendro.to_linkage_matrix(), z);
        assert_eq!(dendro.exemplars(), &exemplars[..]);
        Ok(())
    }

    fn symmetric(n: usize, values: &[u8]) -> Array2<f64> {
        let mut m = Array2::zeros((n, n));
        let mut k = 0;
        for i in 0..n {
            for j in 0..i {
                let v = values[k % values.len()] as f64;
                m[[i, j]] = v;
                m[[j, i]] = v;
                k += 1;
            }
        }
        m
    }

    proptest! {
        #[test]
        fn structural_invariants_hold(
            n in 1usize..24,
            values in proptest::collection::vec(0u8..20, 1..300),
            seed in any::<u64>(),
        ) {
            let m = symmetric(n, &values);
            let mut pc = Protoclust::from_array(m.view(), seeded(seed)).unwrap();

            for i in 0..pc.n_steps() {
                let before: Vec<usize> = pc.available().to_vec();
                pc.compute_index(i).unwrap();
                let step = pc.merges()[i];
                let (a, b) = (step.cluster_a, step.cluster_b);

                // The merged pair are reciprocal nearest neighbors.
                let dab = pc.distance(a, b).unwrap();
                for &k in before.iter().filter(|&&k| k != a && k != b) {
                    prop_assert!(pc.distance(a, k).unwrap() >= dab);
                    prop_assert!(pc.distance(b, k).unwrap() >= dab);
                }

                // Sizes add up and members are the sorted union.
                let id = n + i;
                let members = pc.members(id).unwrap();
                let mut union: Vec<usize> = pc.members(a).unwrap().to_vec();
                union.extend_from_slice(pc.members(b).unwrap());
                union.sort_unstable();
                prop_assert_eq!(members, &union[..]);
                prop_assert_eq!(step.size, members.len());

                // Height and exemplar come from the input distances.
                let brute = minimax_linkage(&m, members, &[]).unwrap();
                prop_assert_eq!(step.distance, brute.radius);
                let exemplar = pc.exemplar(id).unwrap();
                prop_assert!(members.binary_search(&exemplar).is_ok());
                let radius = members
                    .iter()
                    .map(|&u| m[[exemplar, u]])
                    .fold(0.0, f64::max);
                prop_assert_eq!(radius, step.distance);

                prop_assert_eq!(pc.available().len(), n - i - 1);
                assert_partition(&pc);
            }

            prop_assert!(pc.is_complete());
            prop_assert_eq!(pc.available(), &[2 * n - 2][..]);
            prop_assert_eq!(pc.members(2 * n - 2).unwrap().len(), n);

            let dendro = pc.into_dendrogram().unwrap();
            prop_assert_eq!(dendro.n_merges(), n - 1);
            for k in 1..=n {
                prop_assert_eq!(dendro.cut_to_k(k).n_clusters(), k);
            }
        }

        #[test]
        fn fixed_seed_is_deterministic(
            n in 2usize..20,
            values in proptest::collection::vec(0u8..6, 1..200),
            seed in any::<u64>(),
        ) {
            let m = symmetric(n, &values);
            let mut a = Protoclust::from_array(m.view(), seeded(seed)).unwrap();
            let mut b = Protoclust::from_array(m.view(), seeded(seed)).unwrap();
            a.compute().unwrap();
            b.compute().unwrap();
            prop_assert_eq!(a.merges(), b.merges());
            prop_assert_eq!(a.exemplars(), b.exemplars());
        }

        #[test]
        fn monotonicity_is_measured_not_assumed(
            coords in proptest::collection::vec(-50.0f64..50.0, 2..16),
            seed in any::<u64>(),
        ) {
            let d = line(&coords);
            let mut pc = Protoclust::from_matrix(&d, seeded(seed)).unwrap();
            pc.compute().unwrap();
            let dendro = pc.into_dendrogram().unwrap();
            // Either answer is legal; the call must just be consistent with
            // the heights it reports.
            let monotone = dendro.merges().enumerate().all(|(i, m)| {
                let h = dendro.height(coords.len() + i).unwrap();
                [m.cluster_a, m.cluster_b]
                    .iter()
                    .all(|&c| dendro.height(c).unwrap() <= h)
            });
            prop_assert_eq!(monotone, dendro.is_monotone());
        }
    }
}
