use super::*;

#[test]
fn test_intrinsics_have_fixed_ids() {
    let interner = TypeInterner::new();
    for kind in IntrinsicKind::ALL {
        assert_eq!(interner.lookup(kind.type_id()), Some(TypeData::Intrinsic(kind)));
    }
    assert_eq!(interner.len(), TypeId::FIRST_USER as usize);
}

#[test]
fn test_structural_interning_deduplicates() {
    let interner = TypeInterner::new();
    let one = interner.literal_number(1.0);
    assert_eq!(one, interner.literal_number(1.0));
    assert_ne!(one, interner.literal_number(2.0));
    assert_eq!(interner.literal_number(0.0), interner.literal_number(-0.0));

    let a = interner.intern_string("a");
    let b = interner.intern_string("b");
    let ab = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(b, TypeId::STRING),
    ]);
    let ba = interner.object(vec![
        PropertyInfo::new(b, TypeId::STRING),
        PropertyInfo::new(a, TypeId::NUMBER),
    ]);
    assert_eq!(ab, ba);
}

#[test]
fn test_object_later_duplicate_wins() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("a");
    let obj = interner.object(vec![
        PropertyInfo::new(a, TypeId::NUMBER),
        PropertyInfo::new(a, TypeId::STRING),
    ]);
    let Some(TypeData::Object(shape)) = interner.lookup(obj) else {
        panic!("expected object");
    };
    assert_eq!(shape.properties.len(), 1);
    assert_eq!(shape.property(a).map(|p| p.type_id), Some(TypeId::STRING));
}

#[test]
fn test_union_normalization() {
    let interner = TypeInterner::new();
    let ns = interner.union2(TypeId::NUMBER, TypeId::STRING);
    let sn = interner.union2(TypeId::STRING, TypeId::NUMBER);
    assert_eq!(ns, sn);

    // Flattening and dedup.
    let nested = interner.union(vec![ns, TypeId::NUMBER, TypeId::BOOLEAN]);
    let Some(TypeData::Union(members)) = interner.lookup(nested) else {
        panic!("expected union");
    };
    assert_eq!(members.len(), 3);

    assert_eq!(interner.union(vec![]), TypeId::NEVER);
    assert_eq!(interner.union2(TypeId::NUMBER, TypeId::NEVER), TypeId::NUMBER);
    assert_eq!(interner.union2(TypeId::NUMBER, TypeId::MIXED), TypeId::MIXED);
    assert_eq!(interner.union2(TypeId::STRING, TypeId::STRING), TypeId::STRING);
}

#[test]
fn test_fresh_type_params_are_distinct() {
    let interner = TypeInterner::new();
    let t1 = interner.fresh_type_param("T", None);
    let t2 = interner.fresh_type_param("T", None);
    assert_ne!(t1, t2);
}

#[test]
fn test_generic_without_params_is_subordinate() {
    let interner = TypeInterner::new();
    let func = interner.function(vec![ParamInfo::required(TypeId::NUMBER)], TypeId::NUMBER);
    assert_eq!(interner.generic(Vec::new(), func), func);
}
