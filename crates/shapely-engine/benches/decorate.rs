use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shapely_engine::{ClassBuilder, ClassId, Constant, Dataclass, Vm};

fn wide_class(vm: &mut Vm, name: &str, attrs: usize, base: Option<ClassId>) -> ClassId {
    let int = vm.types.int_type();
    let mut builder = ClassBuilder::new(name);
    if let Some(base) = base {
        builder = builder.base(base);
    }
    for i in 0..attrs {
        let attr = format!("{}_{}", name.to_lowercase(), i);
        if i % 2 == 0 {
            builder = builder.annotate(attr, int);
        } else {
            builder = builder.declare(attr, int, vm.constant(Constant::Int(i as i64)));
        }
    }
    builder.build(vm).unwrap()
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat");

    for attrs in [4usize, 32, 256] {
        let mut vm = Vm::new();
        let cls = wide_class(&mut vm, "Flat", attrs, None);
        let decorator = Dataclass::new();

        group.throughput(Throughput::Elements(attrs as u64));
        group.bench_with_input(BenchmarkId::new("attributes", attrs), &cls, |b, &cls| {
            b.iter(|| decorator.decorate(&mut vm, black_box(cls)).unwrap());
        });
    }

    group.finish();
}

fn bench_inheritance_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("inheritance");

    for depth in [2usize, 8, 32] {
        let mut vm = Vm::new();
        let decorator = Dataclass::new();
        let mut base = None;
        for level in 0..depth {
            let cls = wide_class(&mut vm, &format!("Level{}", level), 4, base);
            decorator.decorate(&mut vm, cls).unwrap();
            base = Some(cls);
        }
        let Some(leaf) = base else { continue };

        group.bench_with_input(BenchmarkId::new("depth", depth), &leaf, |b, &leaf| {
            b.iter(|| decorator.decorate(&mut vm, black_box(leaf)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flat, bench_inheritance_chain);
criterion_main!(benches);
