//! End-to-end conversion of a small GFF3 file into stored items

use flate2::read::GzDecoder;
use gffload::convert::{make_location, EntityCache, Persist, Resolution};
use gffload::formats::gff::Gff3Stream;
use gffload::store::{ItemStore, JsonLinesStore, MemoryStore};
use gffload::{Gff3Record, Item, ItemId, LoaderConfig, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tempfile::tempdir;

const ANNOTATION: &str = "\
##gff-version 3
2L\tFlyBase\tgene\t7529\t9484\t.\t+\t.\tID=FBgn0031208;Name=CG11023;Dbxref=FlyBase_Annotation_IDs:CG11023,EntrezGene:33155
2L\tFlyBase\tgene\t9839\t21376\t.\t-\t.\tID=FBgn0002121;Name=l(2)gl;Alias=lgl,l(2)gl;Dbxref=EntrezGene:33156
2R\tFlyBase\tgene\t21376\t9839\t.\t?\t.\tID=FBgn0000490;Name=dpp;Dbxref=EntrezGene:33432,FlyBase:33432
";

const CONFIG: &str = r#"
data_source = "FlyBase"
data_set = "FlyBase Drosophila melanogaster genes"
taxon_id = "7227"
identifier_namespace = 1
"#;

/// Minimal loader loop: one Gene per record, synonyms for ID, Name and
/// Alias, cross-references from Dbxref, one Location per gene.
fn load<S: ItemStore>(
    cache: &mut EntityCache<S>,
    stream: impl Iterator<Item = Result<Gff3Record>>,
) -> Result<()> {
    let organism = cache.default_organism();
    let mut chromosomes: HashMap<String, ItemId> = HashMap::new();

    for record in stream {
        let record = record?;

        let chromosome = match chromosomes.get(&record.seqid) {
            Some(&id) => id,
            None => {
                let mut item = cache.writer_mut().create_item("Chromosome");
                item.set_attribute("primaryIdentifier", record.seqid.as_str());
                let id = cache.writer_mut().store(item, &record.seqid)?;
                chromosomes.insert(record.seqid.clone(), id);
                id
            }
        };

        let mut gene = cache.writer_mut().create_item("Gene");
        let primary = record.id().unwrap_or_default().to_string();
        gene.set_attribute("primaryIdentifier", primary.as_str());
        if let Some(organism) = organism {
            gene.set_reference("organism", organism);
        }
        let gene_id = gene.identifier;

        let mut staged: Vec<Item> = Vec::new();
        let mut names = vec![("identifier", primary.clone(), Some(true))];
        names.extend(record.name().map(|n| ("name", n.to_string(), None)));
        names.extend(
            record
                .attributes
                .values("Alias")
                .into_iter()
                .map(|a| ("alias", a.to_string(), None)),
        );
        for (kind, value, is_primary) in names {
            if let Resolution::Staged(item) =
                cache.resolve_synonym(gene_id, kind, &value, is_primary, Persist::Deferred)?
            {
                staged.push(item);
            }
        }
        for dbxref in record.attributes.values("Dbxref") {
            if let Some((db, value)) = dbxref.split_once(':') {
                if let Resolution::Staged(item) =
                    cache.resolve_cross_reference(gene_id, value, db, Persist::Deferred)?
                {
                    staged.push(item);
                }
            }
        }

        cache.writer_mut().store(gene, &primary)?;
        for item in staged {
            cache.commit(item)?;
        }

        make_location(
            cache.writer_mut(),
            chromosome,
            gene_id,
            record.start,
            record.end,
            record.strand.symbol(),
        )?;
    }

    cache.writer_mut().close()
}

fn items_of<'a>(items: &'a [Item], class_name: &'a str) -> Vec<&'a Item> {
    items.iter().filter(|i| i.class_name == class_name).collect()
}

#[test]
fn test_load_into_memory_store() {
    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let mut cache = EntityCache::from_config(MemoryStore::new(), &config).unwrap();
    let stream = Gff3Stream::open(ANNOTATION.as_bytes()).unwrap();

    load(&mut cache, stream).unwrap();

    let writer = cache.into_writer();
    assert_eq!(writer.stored_count("DataSource"), 3);
    assert_eq!(writer.stored_count("DataSet"), 1);
    assert_eq!(writer.stored_count("Organism"), 1);
    assert_eq!(writer.stored_count("Chromosome"), 2);
    assert_eq!(writer.stored_count("Gene"), 3);
    assert_eq!(writer.stored_count("Location"), 3);
    // 3 identifiers, 3 names and 2 aliases; the alias l(2)gl differs from
    // the name l(2)gl by type
    assert_eq!(writer.stored_count("Synonym"), 8);
    // FlyBase:33432 has the same subject and value as EntrezGene:33432
    assert_eq!(writer.stored_count("CrossReference"), 4);

    let store = writer.into_sink();
    assert!(store.is_closed());
    let items = store.items();

    let data_set = items_of(items, "DataSet")[0].identifier;
    for gene in items_of(items, "Gene") {
        assert_eq!(gene.collection("dataSets"), &[data_set]);
        assert!(gene.reference("organism").is_some());
    }
    for class in ["DataSource", "DataSet", "Organism"] {
        assert!(items_of(items, class)
            .iter()
            .all(|i| i.collections.is_empty()));
    }

    // Every synonym and cross-reference is stored after its subject
    let position: HashMap<ItemId, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.identifier, i))
        .collect();
    for item in items_of(items, "Synonym")
        .into_iter()
        .chain(items_of(items, "CrossReference"))
    {
        let subject = item.reference("subject").unwrap();
        assert!(position[&subject] < position[&item.identifier]);
    }

    // The reversed coordinates of dpp are normalized
    let dpp_location = items_of(items, "Location")[2];
    assert_eq!(dpp_location.attribute("start"), Some("9839"));
    assert_eq!(dpp_location.attribute("end"), Some("21376"));
    assert_eq!(dpp_location.attribute("strand"), Some("?"));
}

#[test]
fn test_load_into_gzip_json_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("items.jsonl.gz");

    let config = LoaderConfig::from_toml_str(CONFIG).unwrap();
    let store = JsonLinesStore::create(&path).unwrap();
    let mut cache = EntityCache::from_config(store, &config).unwrap();
    load(&mut cache, Gff3Stream::open(ANNOTATION.as_bytes()).unwrap()).unwrap();
    let total = cache.writer().total_stored();
    assert_eq!(cache.writer().sink().items_written(), total);
    drop(cache);

    let reader = BufReader::new(GzDecoder::new(File::open(&path).unwrap()));
    let items: Vec<Item> = reader
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();

    assert_eq!(items.len(), total);
    assert_eq!(items[0].class_name, "DataSource");
    assert_eq!(items[0].identifier.to_string(), "1_1");
    assert_eq!(items[0].attribute("name"), Some("FlyBase"));
    assert_eq!(items[1].class_name, "DataSet");
    assert_eq!(items[1].reference("dataSource"), Some(items[0].identifier));
    assert_eq!(items[2].class_name, "Organism");
    assert_eq!(items[2].attribute("taxonId"), Some("7227"));
}

#[test]
fn test_malformed_record_aborts_load() {
    let text = format!("{}2R\tFlyBase\tgene\t1\t2\t.\t+\t5\tID=bad\n", ANNOTATION);
    let mut cache = EntityCache::from_config(MemoryStore::new(), &LoaderConfig::default()).unwrap();
    let stream = Gff3Stream::open(text.as_bytes()).unwrap();

    let err = load(&mut cache, stream).unwrap_err();
    assert_eq!(err.line(), Some(5));
    assert_eq!(cache.writer().stored_count("Gene"), 3);
    assert!(!cache.writer().sink().is_closed());
}
