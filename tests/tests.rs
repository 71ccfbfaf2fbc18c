use std::thread;

use approx::assert_relative_eq;
use pairmc::{
    error::InteractionError,
    interaction::Interaction,
    io::{read_snapshot, write_snapshot},
    mc::{metropolis_accepts, MonteCarlo},
    mc_from_inputparams,
    particle::{IsParticle, Particle, Particles},
    position::Position,
    potentials::{reduced_distance, wca::Wca, Potential},
    properties::{PairClass, Properties},
    seeded_rng,
    simbox::Boundary,
    stats::RunStats,
    InputParams,
};
use quickcheck_macros::quickcheck;
use rand::Rng;

fn params(model: u8, box_length: f64, boundary: Boundary) -> InputParams {
    let mut ip = InputParams::default();
    ip.interaction_model = model;
    ip.box_length = box_length;
    ip.boundary = boundary;
    ip.num_particles = 2;
    ip
}

fn particle(id: u16, x: f64, y: f64) -> Particle {
    Particle::new(id, 0, Position::new([x, y]), 0.5)
}

// p0 moves from `curr` to `trial`, p1 stays put
fn two_particles(curr: [f64; 2], trial: [f64; 2], other: [f64; 2]) -> Vec<Particle> {
    let mut p0 = particle(0, curr[0], curr[1]);
    p0.set_trial_pos(Position::new(trial));
    let p1 = particle(1, other[0], other[1]);
    vec![p0, p1]
}

const TEST_EPSILON: f64 = 0.000001;

#[test]
fn wca_delta_matches_direct_energy() {
    let ip = params(2, 10.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let particles = two_particles([0.0, 0.0], [1.0, 0.0], [1.5, 0.0]);

    let delta = interaction.periodic_energy_delta(&particles, 0).unwrap();
    let expected = Wca::new(1.0).energy(0.5, 1.0);
    assert_relative_eq!(expected, 4.0 * (4096.0 - 64.0 + 0.25));
    assert_relative_eq!(delta, expected, max_relative = TEST_EPSILON);
}

#[test]
fn lj_tail_correction_added_once() {
    let ip = params(1, 10.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let tail = interaction.truncation().tail_correction();
    assert!(tail < 0.0);

    // no move: every pair term cancels, only the tail correction remains
    let particles = two_particles([0.0, 0.0], [0.0, 0.0], [2.5, 0.0]);
    assert_eq!(interaction.periodic_energy_delta(&particles, 0).unwrap(), tail);

    let mut crowd = particles.clone();
    for id in 2..12 {
        crowd.push(particle(id, -4.0 + 0.7 * id as f64, 3.0));
    }
    assert_eq!(interaction.periodic_energy_delta(&crowd, 0).unwrap(), tail);
}

#[test]
fn tail_correction_only_for_lj() {
    for model in [2, 3] {
        let interaction = Interaction::new(&params(model, 10.0, Boundary::Periodic)).unwrap();
        assert_eq!(interaction.truncation().tail_correction(), 0.0);
        assert_eq!(interaction.truncation().shift(), 0.0);
        let particles = two_particles([0.0, 0.0], [0.0, 0.0], [3.0, 1.0]);
        assert_eq!(interaction.periodic_energy_delta(&particles, 0).unwrap(), 0.0);
    }
}

#[test]
fn spring_cutoff_follows_box() {
    let interaction = Interaction::new(&params(3, 12.0, Boundary::Periodic)).unwrap();
    assert_eq!(interaction.truncation().dist(), 6.0);
    let interaction = Interaction::new(&params(1, 12.0, Boundary::Periodic)).unwrap();
    assert_eq!(interaction.truncation().dist(), 2.5);
}

#[test]
fn hard_disk_threshold() {
    let ip = params(0, 10.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();

    let mut p0 = Particle::new(0, 0, Position::new([0.0, 0.0]), 1.0);
    let p1 = Particle::new(1, 0, Position::new([0.0, 0.0]), 1.0);

    p0.set_trial_pos(Position::new([1.9, 0.0]));
    assert!(!interaction.hard_disk_accepted(&[p0.clone(), p1.clone()], 0));

    p0.set_trial_pos(Position::new([2.1, 0.0]));
    assert!(interaction.hard_disk_accepted(&[p0, p1], 0));
}

#[test]
fn hard_disk_model_has_no_energy() {
    let ip = params(0, 10.0, Boundary::Rigid);
    let interaction = Interaction::new(&ip).unwrap();
    assert!(!interaction.has_continuous_potential());

    let particles = two_particles([0.0, 0.0], [0.5, 0.0], [3.0, 0.0]);
    assert_eq!(
        interaction.energy_delta(&particles, 0),
        Err(InteractionError::NoContinuousPotential)
    );
    assert_eq!(
        interaction.periodic_energy_delta(&particles, 0),
        Err(InteractionError::NoContinuousPotential)
    );
    assert!(interaction.hard_disk_accepted(&particles, 0));
}

#[test]
fn unknown_model_is_rejected() {
    let ip = params(7, 10.0, Boundary::Periodic);
    assert_eq!(
        Interaction::new(&ip).unwrap_err(),
        InteractionError::UnknownModel(7)
    );
    assert!(ip.check().is_err());
}

#[test]
fn non_periodic_delta_is_translation_invariant() {
    let ip = params(1, 10.0, Boundary::Rigid);
    let interaction = Interaction::new(&ip).unwrap();

    let build = |dx: f64, dy: f64| {
        let mut particles = two_particles([dx, dy], [0.3 + dx, 0.2 + dy], [1.2 + dx, 0.1 + dy]);
        particles.push(particle(2, -0.4 + dx, 1.3 + dy));
        particles
    };

    let reference = interaction.non_periodic_energy_delta(&build(0.0, 0.0), 0).unwrap();
    assert!(reference.is_finite() && reference != 0.0);
    for (dx, dy) in [(1.5, -2.0), (-3.25, 0.75), (0.001, 2.5)] {
        let shifted = interaction.non_periodic_energy_delta(&build(dx, dy), 0).unwrap();
        assert_relative_eq!(shifted, reference, max_relative = 1e-9);
    }
}

#[test]
fn periodic_delta_is_invariant_under_box_shifts() {
    let box_length = 10.0;
    let ip = params(1, box_length, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();

    // p1 sits across the boundary from p0, p2 is a direct neighbour
    let build = |dx: f64, dy: f64| {
        let mut particles = two_particles([4.5 + dx, dy], [4.7 + dx, 0.1 + dy], [-4.6 + dx, 0.2 + dy]);
        particles.push(particle(2, 3.5 + dx, 0.5 + dy));
        particles
    };

    let reference_particles = build(0.0, 0.0);
    let direct = reduced_distance(reference_particles[0].pos(), reference_particles[1].pos(), 1.0);
    assert!(direct > interaction.truncation().dist());

    let reference = interaction.periodic_energy_delta(&reference_particles, 0).unwrap();
    assert!(reference.is_finite() && reference != 0.0);
    for (dx, dy) in [(box_length, 0.0), (0.0, box_length), (box_length, box_length)] {
        let shifted = interaction.periodic_energy_delta(&build(dx, dy), 0).unwrap();
        assert_relative_eq!(shifted, reference, max_relative = 1e-9);
    }
}

#[test]
fn delta_is_idempotent() {
    let ip = params(3, 8.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let particles = two_particles([0.0, 0.0], [0.2, -0.1], [1.4, 0.3]);

    let first = interaction.energy_delta(&particles, 0).unwrap();
    let second = interaction.energy_delta(&particles, 0).unwrap();
    assert_eq!(first, second);
}

#[quickcheck]
fn reduced_distance_is_symmetric(a: (i16, i16), b: (i16, i16)) -> bool {
    let p0 = Position::new([a.0 as f64 / 100.0, a.1 as f64 / 100.0]);
    let p1 = Position::new([b.0 as f64 / 100.0, b.1 as f64 / 100.0]);
    let d01 = reduced_distance(p0, p1, 1.3);
    let d10 = reduced_distance(p1, p0, 1.3);
    d01 == d10 && d01 >= 0.0
}

#[test]
fn two_images_inside_cutoff_both_count() {
    // box narrower than twice the cutoff
    let ip = params(1, 4.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let potential = interaction.potential().unwrap();

    // current position sees no image inside 2.5, the trial sees two: at 1.9 and 2.1
    let particles = two_particles([1.9, 1.9], [1.9, 0.0], [0.0, 0.0]);
    let delta = interaction.periodic_energy_delta(&particles, 0).unwrap();

    let expected =
        potential.energy(1.9, 1.0) + potential.energy(2.1, 1.0) + interaction.truncation().tail_correction();
    assert_relative_eq!(delta, expected, max_relative = TEST_EPSILON);
}

#[test]
fn non_periodic_ignores_pairs_past_cutoff() {
    let ip = params(1, 10.0, Boundary::Rigid);
    let interaction = Interaction::new(&ip).unwrap();

    let far = two_particles([3.0, 0.0], [2.6, 0.0], [0.0, 0.0]);
    assert_eq!(interaction.non_periodic_energy_delta(&far, 0).unwrap(), 0.0);

    let crossing = two_particles([3.0, 0.0], [2.0, 0.0], [0.0, 0.0]);
    let expected = interaction.potential().unwrap().energy(2.0, 1.0);
    assert_relative_eq!(
        interaction.energy_delta(&crossing, 0).unwrap(),
        expected,
        epsilon = TEST_EPSILON
    );
}

#[test]
fn unset_trial_gives_zero_delta() {
    let ip = params(1, 10.0, Boundary::Rigid);
    let interaction = Interaction::new(&ip).unwrap();
    let particles: Vec<Particle> = (0..5).map(|id| particle(id, 1.1 * id as f64, 0.0)).collect();
    for idx in 0..particles.len() {
        assert_eq!(interaction.non_periodic_energy_delta(&particles, idx).unwrap(), 0.0);
    }
}

#[test]
fn affinity_scales_unlike_pairs() {
    let mut ip = params(1, 10.0, Boundary::Rigid);
    ip.ref_affinity = 2.0;
    ip.affinity_mult = 0.25;
    let interaction = Interaction::new(&ip).unwrap();

    let mut like = two_particles([0.0, 0.0], [0.0, 0.3], [1.5, 0.0]);
    let like_delta = interaction.energy_delta(&like, 0).unwrap();
    like[1] = Particle::new(1, 1, Position::new([1.5, 0.0]), 0.5);
    let unlike_delta = interaction.energy_delta(&like, 0).unwrap();
    assert_relative_eq!(unlike_delta, 0.25 * like_delta, max_relative = TEST_EPSILON);
}

#[test]
fn metropolis_rejects_non_finite() {
    let mut rng = seeded_rng(&InputParams::default());
    for _ in 0..100 {
        assert!(!metropolis_accepts(f64::NAN, 1.0, &mut rng));
        assert!(!metropolis_accepts(f64::INFINITY, 1.0, &mut rng));
        assert!(metropolis_accepts(-1.0, 1.0, &mut rng));
        assert!(metropolis_accepts(0.0, 1.0, &mut rng));
    }
}

#[test]
fn coincident_trial_gives_non_finite_delta() {
    for boundary in [Boundary::Periodic, Boundary::Rigid] {
        let interaction = Interaction::new(&params(1, 10.0, boundary)).unwrap();
        let particles = two_particles([0.0, 0.0], [1.0, 0.0], [1.0, 0.0]);

        let periodic = interaction.periodic_energy_delta(&particles, 0).unwrap();
        let non_periodic = interaction.non_periodic_energy_delta(&particles, 0).unwrap();
        assert!(!periodic.is_finite());
        assert!(!non_periodic.is_finite());
        assert!(!interaction.energy_delta(&particles, 0).unwrap().is_finite());
    }
}

#[test]
fn driver_rejects_coincident_move() {
    let ip = params(1, 10.0, Boundary::Periodic);
    let particles = Particles::new(vec![particle(0, 0.0, 0.0), particle(1, 1.0, 0.0)]);
    let mut mc = MonteCarlo::new(&ip, particles).unwrap();
    let mut rng = seeded_rng(&ip);
    let onto_p1 = Position::new([1.0, 0.0]);

    mc.set_trial_pos(0, onto_p1);
    assert!(mc.evaluate_trial(0, &mut rng).is_err());

    let mut stats = RunStats::new();
    mc.try_move(0, onto_p1, &mut rng, &mut stats);
    assert_eq!(stats.num_errors(), 1);
    assert_eq!(stats.num_accepts(), 0);
    assert_eq!(mc.particle(0).pos(), Position::new([0.0, 0.0]));
    assert_eq!(mc.particle(0).trial_pos(), Position::new([0.0, 0.0]));
    assert!(mc.well_formed());
}

#[test]
fn driver_and_statistics_share_one_box() {
    let mut ip = params(2, 10.0, Boundary::Rigid);
    ip.num_particles = 9;
    let mut rng = seeded_rng(&ip);
    let mc = mc_from_inputparams(&ip, &mut rng).unwrap();

    assert!(std::ptr::eq(mc.simbox(), mc.interaction().simbox()));
    assert!(!mc.simbox().is_periodic());
    assert_eq!(mc.simbox().box_length(), 10.0);
}

#[test]
fn properties_count_each_pair_once() {
    let ip = params(2, 10.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let mut props = Properties::new(&ip, interaction.simbox()).unwrap();
    let particles = vec![
        Particle::new(0, 0, Position::new([0.0, 0.0]), 0.5),
        Particle::new(1, 1, Position::new([1.0, 0.0]), 0.5),
    ];
    props.sample_periodic(&particles);

    assert_eq!(props.num_samples(), 1);
    assert_relative_eq!(props.energies()[0], 1.0, epsilon = TEST_EPSILON);
    assert_relative_eq!(props.virials()[0], 24.0, epsilon = TEST_EPSILON);

    let bin = (1.0 / props.bin_width()).round() as usize;
    assert_eq!(props.histogram(PairClass::All).radial()[bin], 2.0);
    assert_eq!(props.histogram(PairClass::Antiparallel).radial()[bin], 2.0);
    assert!(props
        .histogram(PairClass::Parallel)
        .radial()
        .iter()
        .all(|c| *c == 0.0));
}

fn run_sweeps(ip: &InputParams, sweeps: usize) -> MonteCarlo {
    let mut rng = seeded_rng(ip);
    let mut mc = mc_from_inputparams(ip, &mut rng).unwrap();
    for _ in 0..sweeps {
        mc.sweep(&mut rng);
    }
    mc
}

#[test]
fn sweeps_keep_particles_in_box() {
    for boundary in [Boundary::Periodic, Boundary::Rigid] {
        let mut ip = InputParams::default();
        ip.num_particles = 36;
        ip.box_length = 8.0;
        ip.reduced_density = 36.0 / 64.0;
        ip.boundary = boundary;
        ip.max_displacement = 0.5;
        ip.check().unwrap();

        let mc = run_sweeps(&ip, 20);
        assert!(mc.well_formed());
        assert_eq!(mc.particles().num_particles(), 36);
    }
}

#[quickcheck]
fn arbitrary_params_run(ip: InputParams) -> bool {
    if ip.check().is_err() {
        return false;
    }
    let mut rng = seeded_rng(&ip);
    let mut mc = match mc_from_inputparams(&ip, &mut rng) {
        Ok(mc) => mc,
        Err(_) => return false,
    };
    let mut attempts = 0;
    for _ in 0..ip.num_sweeps {
        attempts += mc.sweep(&mut rng).num_attempts();
    }
    mc.sample_properties();
    mc.well_formed()
        && attempts == ip.num_sweeps * ip.num_particles
        && mc.properties().num_samples() == 1
}

#[test]
fn interaction_shared_across_threads() {
    let ip = params(1, 10.0, Boundary::Periodic);
    let interaction = Interaction::new(&ip).unwrap();
    let mut particles: Vec<Particle> = (0..16)
        .map(|id| particle(id, -4.0 + 1.1 * (id % 4) as f64, -4.0 + 1.3 * (id / 4) as f64))
        .collect();
    for p in particles.iter_mut() {
        let trial = p.pos().translate_by(0.1, -0.05);
        p.set_trial_pos(trial);
    }

    let sequential: Vec<f64> = (0..particles.len())
        .map(|idx| interaction.energy_delta(&particles, idx).unwrap())
        .collect();
    let parallel: Vec<f64> = thread::scope(|s| {
        let handles: Vec<_> = (0..particles.len())
            .map(|idx| {
                let interaction = &interaction;
                let particles = &particles;
                s.spawn(move || interaction.energy_delta(particles, idx).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(sequential, parallel);
}

#[test]
fn snapshot_resumes_same_state() {
    let mut ip = InputParams::default();
    ip.num_particles = 16;
    let mut rng = seeded_rng(&ip);
    let mut mc = mc_from_inputparams(&ip, &mut rng).unwrap();
    mc.sweep(&mut rng);

    let path = std::env::temp_dir().join("pairmc_snapshot_test.json");
    let path = path.to_str().unwrap();
    write_snapshot(&mc, &rng, path).unwrap();
    let mut snapshot = read_snapshot(path).unwrap();

    assert_eq!(snapshot.particles.as_slice(), mc.particles().as_slice());
    assert_eq!(snapshot.rng.random::<u64>(), rng.random::<u64>());

    let resumed = MonteCarlo::new(&ip, Particles::new(snapshot.particles.as_slice().to_vec())).unwrap();
    assert!(resumed.well_formed());
}
