use criterion::{Criterion, black_box, criterion_group, criterion_main};
use jlens::scanner::Scanner;
use jlens::scanner::java::JavaParser;
use std::path::Path;

fn controller_source(package: &str, index: usize) -> String {
    format!(
        r#"package {package};

import {package}.model.Item{index};
import java.util.List;

@RestController
@RequestMapping("/api/items{index}")
public class ItemController{index} extends BaseController {{
    private ItemService{index} service;
    private Item{index} current;

    @GetMapping
    public List<Item{index}> list() {{
        return service.findAll();
    }}

    @GetMapping("/{{id}}")
    public Item{index} get(@PathVariable Long id) {{
        return service.find(id);
    }}

    @PostMapping
    public Item{index} create(@RequestBody Item{index} item) {{
        return service.save(item);
    }}

    @Scheduled(cron = "0 0 * * * *")
    public void refresh() {{
    }}

    private void audit(String action) {{
    }}
}}
"#
    )
}

/// Writes `count` controllers across a few packages plus a pom.
fn synthetic_project(root: &Path, count: usize) {
    for index in 0..count {
        let package = format!("com.bench.module{}", index % 8);
        let dir = root
            .join("src/main/java")
            .join(package.replace('.', "/"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(format!("ItemController{index}.java")),
            controller_source(&package, index),
        )
        .unwrap();
    }
    std::fs::write(
        root.join("pom.xml"),
        "<project><dependencies><dependency><artifactId>spring-web</artifactId></dependency></dependencies></project>",
    )
    .unwrap();
}

fn bench_parse_unit(c: &mut Criterion) {
    let source = controller_source("com.bench", 0);
    let mut parser = JavaParser::new().unwrap();

    c.bench_function("parse_controller", |b| {
        b.iter(|| {
            let unit = parser.parse(black_box("ItemController0.java"), black_box(&source));
            black_box(unit)
        })
    });
}

fn bench_scan_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_project");
    group.sample_size(20);

    for count in [10usize, 100].iter() {
        let dir = tempfile::tempdir().unwrap();
        synthetic_project(dir.path(), *count);
        let mut scanner = Scanner::new(dir.path().to_path_buf()).unwrap();

        group.bench_with_input(format!("files_{count}"), count, |b, _| {
            b.iter(|| {
                let result = scanner.scan().unwrap();
                black_box(result)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_unit, bench_scan_project);
criterion_main!(benches);
