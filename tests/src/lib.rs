//! End-to-end scenarios spanning more than one module of `bedrock`,
//! exercised through only its public API.

#[cfg(test)]
mod tests {
    use bedrock::vector::SortAlgorithm;
    use bedrock::{Array, BinaryHeap, DList, HashTable, Map, RbTree, SList, Vector};
    use std::ops::ControlFlow;

    #[test]
    fn rbtree_fill_shuffle_erase_stays_balanced() {
        let mut t: RbTree<i32> = (0..500).collect();
        assert_eq!(t.len(), 500);

        let mut order: Vec<i32> = (0..500).step_by(2).collect();
        use rand::seq::SliceRandom;
        order.shuffle(&mut rand::thread_rng());
        for v in order {
            assert_eq!(t.erase(&v), Some(v));
        }
        assert_eq!(t.len(), 250);
        for v in (1..500).step_by(2) {
            assert!(t.contains(&v));
        }
    }

    #[test]
    fn heap_drains_in_descending_order() {
        let data: Vec<i32> = vec![5, 1, 9, 3, 7, 2, 8, 4, 6, 0];
        let mut h: BinaryHeap<i32> = data.into_iter().collect();
        let mut out = Vec::new();
        while let Some(v) = h.pop() {
            out.push(v);
        }
        let mut expected = vec![5, 1, 9, 3, 7, 2, 8, 4, 6, 0];
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(out, expected);
    }

    #[test]
    fn hash_table_survives_concurrent_rehash_and_lookup() {
        let mut h: HashTable<i32, i32> = HashTable::new();
        for i in 0..300 {
            h.insert(i, i * i);
        }
        h.resize(512, None);
        for i in 0..300 {
            assert_eq!(h.find(&i), Some(&(i * i)));
        }
        assert_eq!(h.len(), 300);
    }

    #[test]
    fn vector_every_sort_algorithm_agrees() {
        let source: Vec<i32> = (0..200).map(|i| (i * 37) % 101).collect();
        let mut reference = source.clone();
        reference.sort();

        for algorithm in [
            SortAlgorithm::Quick,
            SortAlgorithm::QuickRandom,
            SortAlgorithm::QuickMedian,
            SortAlgorithm::Heap,
        ] {
            let mut v: Vector<i32> = source.iter().copied().collect();
            v.sort(algorithm);
            assert_eq!(v.as_slice(), reference.as_slice());
        }
    }

    #[test]
    fn dlist_and_slist_merge_sort_agree_with_vector_sort() {
        let source: Vec<i32> = vec![9, 4, 1, 7, 3, 8, 2, 6, 5, 0];
        let mut reference: Vector<i32> = source.iter().copied().collect();
        reference.sort(SortAlgorithm::Quick);

        let mut dlist: DList<i32> = source.iter().copied().collect();
        dlist.sort();
        let mut fwd = Vec::new();
        dlist.foreach(bedrock::list::Direction::Fwd, |v| {
            fwd.push(*v);
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(fwd, reference.as_slice());

        let mut slist: SList<i32> = source.into_iter().collect();
        slist.sort();
        let mut slist_out = Vec::new();
        slist.foreach(|v| {
            slist_out.push(*v);
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(slist_out, reference.as_slice());
    }

    #[test]
    fn map_entries_share_values_through_array_backed_payloads() {
        let mut m: Map<String, Array<i32>> = Map::new();
        m.insert("evens".to_string(), Array::alloc(4)).unwrap();

        let shared = m.find_shared(&"evens".to_string()).unwrap();
        assert_eq!(shared.get().unwrap().len(), 4);

        let (_, removed) = m.erase(&"evens".to_string()).unwrap();
        assert_eq!(removed.get().unwrap().len(), 4);
        assert!(m.is_empty());
    }
}
